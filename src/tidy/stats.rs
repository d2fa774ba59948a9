use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::metadata::{NormalizedItem, UNKNOWN_NARRATOR};

/// Library-wide totals gathered during a scan
///
/// Built as a fold over items; `merge` is associative and commutative so
/// the order in which items are visited never changes the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub items: usize,
    pub authors: BTreeSet<String>,
    pub narrators: BTreeSet<String>,
    pub series: BTreeSet<String>,
    pub standalone_count: usize,
    /// Whole milliseconds, so sums are exact whatever the visiting order
    pub total_duration_ms: u64,
    pub total_size: u64,
}

/// Flattened counts for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub items: usize,
    pub authors: usize,
    pub narrators: usize,
    pub series: usize,
    pub standalone_count: usize,
    pub total_duration: f64,
    pub total_size: u64,
    pub formatted_duration: String,
    pub formatted_size: String,
}

impl LibraryStatistics {
    /// Totals for a single item
    pub fn for_item(item: &NormalizedItem, size_bytes: u64) -> Self {
        let mut stats = Self::default();
        stats.record(item, size_bytes);
        stats
    }

    /// Fold one item into the totals
    pub fn record(&mut self, item: &NormalizedItem, size_bytes: u64) {
        self.items += 1;
        self.authors.insert(item.author.clone());
        if item.narrator != UNKNOWN_NARRATOR {
            self.narrators.insert(item.narrator.clone());
        }
        if item.is_standalone() {
            self.standalone_count += 1;
        } else {
            self.series.insert(item.series_title.clone());
        }
        self.total_duration_ms += duration_ms(item.duration_seconds);
        self.total_size += size_bytes;
    }

    /// Combine two partial folds
    pub fn merge(mut self, other: LibraryStatistics) -> Self {
        self.items += other.items;
        self.authors.extend(other.authors);
        self.narrators.extend(other.narrators);
        self.series.extend(other.series);
        self.standalone_count += other.standalone_count;
        self.total_duration_ms += other.total_duration_ms;
        self.total_size += other.total_size;
        self
    }

    pub fn summary(&self) -> StatisticsSummary {
        StatisticsSummary {
            items: self.items,
            authors: self.authors.len(),
            narrators: self.narrators.len(),
            series: self.series.len(),
            standalone_count: self.standalone_count,
            total_duration: self.total_duration_ms as f64 / 1000.0,
            total_size: self.total_size,
            formatted_duration: format_duration(self.total_duration_ms as f64 / 1000.0),
            formatted_size: format_size(self.total_size),
        }
    }
}

fn duration_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Format a number of seconds as "12h 05m", with a day prefix past 24 hours
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds.max(0.0) / 60.0) as u64;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    if days > 0 {
        format!("{}d {}h {:02}m", days, hours, minutes)
    } else {
        format!("{}h {:02}m", hours, minutes)
    }
}

/// Format a byte count in gigabytes with two decimals
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(author: &str, narrator: &str, series: &str, duration: f64) -> NormalizedItem {
        NormalizedItem {
            author: author.to_string(),
            title: "Title".to_string(),
            narrator: narrator.to_string(),
            series_title: series.to_string(),
            book_number: String::new(),
            duration_seconds: duration,
        }
    }

    fn sample() -> Vec<(NormalizedItem, u64)> {
        vec![
            (item("A", "N1", "S1", 3600.0), 100),
            (item("A", "N2", "", 1800.0), 200),
            (item("B", UNKNOWN_NARRATOR, "S1", 60.0), 300),
            (item("C", "N1", "S2", 0.0), 400),
        ]
    }

    #[test]
    fn test_record_counts() {
        let mut stats = LibraryStatistics::default();
        for (item, size) in sample() {
            stats.record(&item, size);
        }

        let summary = stats.summary();
        assert_eq!(summary.items, 4);
        assert_eq!(summary.authors, 3);
        assert_eq!(summary.narrators, 2);
        assert_eq!(summary.series, 2);
        assert_eq!(summary.standalone_count, 1);
        assert_eq!(summary.total_duration, 5460.0);
        assert_eq!(summary.total_size, 1000);
    }

    #[test]
    fn test_order_independent() {
        let mut forward = LibraryStatistics::default();
        for (item, size) in sample() {
            forward.record(&item, size);
        }

        let mut backward = LibraryStatistics::default();
        for (item, size) in sample().into_iter().rev() {
            backward.record(&item, size);
        }

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_fractional_durations_sum_exactly() {
        let items: Vec<_> = [0.1, 0.2, 0.3, 89000.25]
            .into_iter()
            .map(|d| item("A", "N", "", d))
            .collect();

        fn fold<'a>(items: impl Iterator<Item = &'a NormalizedItem>) -> LibraryStatistics {
            items
                .map(|item| LibraryStatistics::for_item(item, 1))
                .fold(LibraryStatistics::default(), LibraryStatistics::merge)
        }
        let forward = fold(items.iter());
        let backward = fold(items.iter().rev());

        assert_eq!(forward, backward);
        assert_eq!(forward.total_duration_ms, 89_000_850);
        assert_eq!(forward.summary().total_duration, 89000.85);
    }

    #[test]
    fn test_merge_matches_single_fold() {
        let items = sample();
        let mut whole = LibraryStatistics::default();
        let mut left = LibraryStatistics::default();
        let mut right = LibraryStatistics::default();
        for (i, (item, size)) in items.iter().enumerate() {
            whole.record(item, *size);
            if i % 2 == 0 {
                left.record(item, *size);
            } else {
                right.record(item, *size);
            }
        }

        assert_eq!(left.clone().merge(right.clone()), whole);
        assert_eq!(right.merge(left), whole);

        let folded = items
            .iter()
            .map(|(item, size)| LibraryStatistics::for_item(item, *size))
            .fold(LibraryStatistics::default(), LibraryStatistics::merge);
        assert_eq!(folded, whole);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0h 00m");
        assert_eq!(format_duration(3600.0 * 12.0 + 300.0), "12h 05m");
        assert_eq!(format_duration(3600.0 * 26.0 + 59.0), "1d 2h 00m");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.00 GB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 / 2), "1.50 GB");
    }
}
