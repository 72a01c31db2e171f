use sea_orm::Order;
use sea_orm::sea_query::SimpleExpr;

/// Ordered list of sort keys, applied left to right.
///
/// Built from column handles (`cols.age.desc()`) and concatenated with
/// [`OrderBy::then`]; the first key is the primary sort.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct OrderBy {
    keys: Vec<(SimpleExpr, Order)>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(expr: SimpleExpr, order: Order) -> Self {
        Self {
            keys: vec![(expr, order)],
        }
    }

    /// Append all keys of `next` after the current ones.
    pub fn then(mut self, next: OrderBy) -> Self {
        self.keys.extend(next.keys);
        self
    }

    pub fn then_by(mut self, expr: SimpleExpr, order: Order) -> Self {
        self.keys.push((expr, order));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SimpleExpr, Order)> {
        self.keys.iter()
    }

    #[must_use]
    pub fn into_keys(self) -> Vec<(SimpleExpr, Order)> {
        self.keys
    }
}

impl Extend<OrderBy> for OrderBy {
    fn extend<I: IntoIterator<Item = OrderBy>>(&mut self, iter: I) {
        for next in iter {
            self.keys.extend(next.keys);
        }
    }
}
