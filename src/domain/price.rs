//! Daily close prices and the normalized price table.
//!
//! The table indexes stocks in first-seen order and keeps, for every date in
//! the sorted union of row dates, the quotes present that day ordered by stock
//! index. Walking a day's quotes therefore visits stocks in first-seen order
//! and naturally skips stocks without a price on that date.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// One normalized input row.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub stock_id: String,
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceRow {
    pub fn new(stock_id: impl Into<String>, date: NaiveDate, close: f64) -> Self {
        Self {
            stock_id: stock_id.into(),
            date,
            close,
        }
    }
}

/// Dense index of a stock in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StockIdx(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub stock: StockIdx,
    pub close: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    stocks: Vec<String>,
    stock_index: HashMap<String, StockIdx>,
    dates: Vec<NaiveDate>,
    quotes: Vec<Vec<Quote>>,
    duplicates: usize,
}

impl PriceTable {
    /// Build a table from rows in input order. A repeated (stock, date) pair
    /// keeps its first close and is counted in [`PriceTable::duplicate_count`].
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = PriceRow>,
    {
        let mut stocks: Vec<String> = Vec::new();
        let mut stock_index: HashMap<String, StockIdx> = HashMap::new();
        let mut by_date: BTreeMap<NaiveDate, Vec<Quote>> = BTreeMap::new();

        for row in rows {
            let stock = match stock_index.get(&row.stock_id) {
                Some(&idx) => idx,
                None => {
                    let idx = StockIdx(stocks.len());
                    stock_index.insert(row.stock_id.clone(), idx);
                    stocks.push(row.stock_id);
                    idx
                }
            };
            by_date.entry(row.date).or_default().push(Quote {
                stock,
                close: row.close,
            });
        }

        let mut duplicates = 0;
        let mut dates = Vec::with_capacity(by_date.len());
        let mut quotes = Vec::with_capacity(by_date.len());
        for (date, mut day) in by_date {
            // stable sort keeps the first occurrence ahead of its duplicates
            day.sort_by_key(|q| q.stock);
            let before = day.len();
            day.dedup_by_key(|q| q.stock);
            duplicates += before - day.len();
            dates.push(date);
            quotes.push(day);
        }

        Self {
            stocks,
            stock_index,
            dates,
            quotes,
            duplicates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn stock_count(&self) -> usize {
        self.stocks.len()
    }

    pub fn date_count(&self) -> usize {
        self.dates.len()
    }

    /// Number of distinct (stock, date) quotes held.
    pub fn quote_count(&self) -> usize {
        self.quotes.iter().map(Vec::len).sum()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// Stock identifiers in first-seen order.
    pub fn stocks(&self) -> &[String] {
        &self.stocks
    }

    /// Sorted, deduplicated trading dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn stock_id(&self, stock: StockIdx) -> &str {
        &self.stocks[stock.0]
    }

    pub fn stock_idx(&self, stock_id: &str) -> Option<StockIdx> {
        self.stock_index.get(stock_id).copied()
    }

    pub fn close(&self, stock_id: &str, date: NaiveDate) -> Option<f64> {
        let stock = self.stock_idx(stock_id)?;
        let day = self.dates.binary_search(&date).ok()?;
        let quotes = &self.quotes[day];
        quotes
            .binary_search_by_key(&stock, |q| q.stock)
            .ok()
            .map(|i| quotes[i].close)
    }

    /// Iterate dates in ascending order together with that day's quotes.
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[Quote])> {
        self.dates
            .iter()
            .copied()
            .zip(self.quotes.iter().map(Vec::as_slice))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(stock: &str, date: &str, close: f64) -> PriceRow {
        PriceRow::new(
            stock,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close,
        )
    }

    fn d(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn stocks_keep_first_seen_order() {
        let table = PriceTable::from_rows(vec![
            row("600000", "2024-01-02", 10.0),
            row("000001", "2024-01-02", 12.0),
            row("600000", "2024-01-03", 10.5),
            row("300750", "2024-01-01", 180.0),
        ]);
        assert_eq!(table.stocks(), ["600000", "000001", "300750"]);
        assert_eq!(table.stock_idx("000001"), Some(StockIdx(1)));
        assert_eq!(table.stock_id(StockIdx(2)), "300750");
    }

    #[test]
    fn dates_are_sorted_union() {
        let table = PriceTable::from_rows(vec![
            row("A", "2024-01-05", 1.0),
            row("B", "2024-01-02", 1.0),
            row("A", "2024-01-02", 1.0),
            row("B", "2024-01-03", 1.0),
        ]);
        assert_eq!(
            table.dates(),
            [d("2024-01-02"), d("2024-01-03"), d("2024-01-05")]
        );
        assert_eq!(table.first_date(), Some(d("2024-01-02")));
        assert_eq!(table.last_date(), Some(d("2024-01-05")));
    }

    #[test]
    fn day_quotes_follow_stock_order_and_skip_missing() {
        let table = PriceTable::from_rows(vec![
            row("A", "2024-01-02", 1.0),
            row("B", "2024-01-02", 2.0),
            row("C", "2024-01-02", 3.0),
            row("C", "2024-01-03", 3.5),
            row("A", "2024-01-03", 1.5),
        ]);
        let days: Vec<_> = table.days().collect();
        assert_eq!(days.len(), 2);

        let (_, second) = days[1];
        let stocks: Vec<_> = second.iter().map(|q| table.stock_id(q.stock)).collect();
        assert_eq!(stocks, ["A", "C"]);
    }

    #[test]
    fn close_lookup() {
        let table = PriceTable::from_rows(vec![
            row("A", "2024-01-02", 10.0),
            row("B", "2024-01-03", 20.0),
        ]);
        assert_eq!(table.close("A", d("2024-01-02")), Some(10.0));
        assert_eq!(table.close("A", d("2024-01-03")), None);
        assert_eq!(table.close("Z", d("2024-01-02")), None);
        assert_eq!(table.close("B", d("2024-02-01")), None);
    }

    #[test]
    fn duplicate_rows_keep_first_close() {
        let table = PriceTable::from_rows(vec![
            row("A", "2024-01-02", 10.0),
            row("A", "2024-01-02", 99.0),
            row("B", "2024-01-02", 5.0),
        ]);
        assert_eq!(table.duplicate_count(), 1);
        assert_eq!(table.quote_count(), 2);
        assert_eq!(table.close("A", d("2024-01-02")), Some(10.0));
    }

    #[test]
    fn empty_table() {
        let table = PriceTable::from_rows(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.stock_count(), 0);
        assert_eq!(table.days().count(), 0);
        assert_eq!(table.first_date(), None);
    }
}
