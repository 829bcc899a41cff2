//! Sample data provider: numbered proverbs that grow at both ends.

use crate::provider::{ChangeNotifier, DataProvider};
use crate::model::RowType;

const PROVERBS: [&str; 8] = [
    "Slow and steady wins the race",
    "Measure twice, cut once",
    "Well begun is half done",
    "Practice makes perfect",
    "Still waters run deep",
    "Fortune favors the bold",
    "Patience is a virtue",
    "Time and tide wait for none",
];

/// Contiguous window of numbered rows.
///
/// Row `n` reads `"  n  <proverb>"`. Appending continues the numbering, prepending
/// counts down through zero into negative numbers.
#[derive(Debug)]
pub struct DemoProvider {
    first: i64,
    len: usize,
    page_size: usize,
    notifier: ChangeNotifier,
}

impl DemoProvider {
    /// Provider holding the first page, rows `1..=page_size`.
    pub fn new(page_size: usize) -> Self {
        Self {
            first: 1,
            len: page_size,
            page_size,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no rows are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number shown on the row at `position`.
    pub fn number(&self, position: usize) -> Option<i64> {
        (position < self.len).then(|| self.first + position as i64)
    }

    /// Text of the row at `position`.
    pub fn text(&self, position: usize) -> Option<String> {
        self.number(position).map(row_text)
    }

    /// Add a page after the last row.
    pub fn append_page(&mut self) {
        let start = self.len;
        self.len += self.page_size;
        self.notifier.notify_range_inserted(start, self.page_size);
    }

    /// Add a page before the first row.
    pub fn prepend_page(&mut self) {
        self.first -= self.page_size as i64;
        self.len += self.page_size;
        self.notifier.notify_range_inserted(0, self.page_size);
    }
}

fn row_text(number: i64) -> String {
    let proverb = PROVERBS[number.rem_euclid(PROVERBS.len() as i64) as usize];
    format!("{number:>3}  {proverb}")
}

impl DataProvider for DemoProvider {
    type Row = String;

    fn count(&self) -> usize {
        self.len
    }

    fn stable_id(&self, position: usize) -> Option<u64> {
        // Order-preserving map of the row number into u64.
        self.number(position)
            .map(|number| number.wrapping_sub(i64::MIN) as u64)
    }

    fn has_stable_ids(&self) -> bool {
        true
    }

    fn create(&mut self, _row_type: RowType) -> String {
        String::new()
    }

    fn bind(&mut self, row: &mut String, position: usize) {
        row.clear();
        if let Some(text) = self.text(position) {
            row.push_str(&text);
        }
    }

    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}
