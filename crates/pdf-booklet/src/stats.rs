use crate::booklet::booklet_order;
use crate::constants::PAGES_PER_SHEET;
use crate::pad::plan_padding;
use crate::types::*;

/// Calculate what padding or imposing a document of `source_pages` pages produces
pub fn calculate_statistics(source_pages: usize, operation: Operation) -> Result<Statistics> {
    match operation {
        Operation::Pad { times } => {
            let plan = plan_padding(source_pages, times, None)?;
            Ok(Statistics {
                source_pages,
                blank_pages_added: plan.pages_needed,
                padded_pages: plan.padded_pages(),
                output_sheets: None,
            })
        }
        Operation::Booklet => {
            let plan = plan_padding(source_pages, PAGES_PER_SHEET, None)?;
            Ok(Statistics {
                source_pages,
                blank_pages_added: plan.pages_needed,
                padded_pages: plan.padded_pages(),
                output_sheets: Some(booklet_order(plan.padded_pages()).len()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_stats() {
        let stats = calculate_statistics(2, Operation::Pad { times: 3 }).unwrap();
        assert_eq!(stats.blank_pages_added, 1);
        assert_eq!(stats.padded_pages, 3);
        assert_eq!(stats.output_sheets, None);
    }

    #[test]
    fn test_booklet_stats_odd_pages() {
        let stats = calculate_statistics(7, Operation::Booklet).unwrap();
        assert_eq!(stats.blank_pages_added, 1);
        assert_eq!(stats.padded_pages, 8);
        assert_eq!(stats.output_sheets, Some(4));
    }

    #[test]
    fn test_booklet_stats_empty() {
        let stats = calculate_statistics(0, Operation::Booklet).unwrap();
        assert_eq!(stats.output_sheets, Some(0));
    }

    #[test]
    fn test_pad_stats_zero_multiple() {
        assert!(calculate_statistics(4, Operation::Pad { times: 0 }).is_err());
    }
}
