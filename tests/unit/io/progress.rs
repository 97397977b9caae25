//! Tests for stage-by-stage batch progress

#[cfg(test)]
mod tests {
    use market_lisa::io::progress::{FileStage, ProgressManager};
    use std::path::Path;

    // Tests every stage of every file moves the bar by one
    // Verified by advancing once per file instead of once per stage
    #[test]
    fn test_stages_advance_bar() {
        let progress = ProgressManager::hidden(2);

        progress.start_file(Path::new("week1.csv"));
        assert_eq!(progress.complete_stage(FileStage::Read, 4), 1);
        assert_eq!(progress.complete_stage(FileStage::Analyze, 4), 2);
        assert_eq!(progress.completed_files(), 0);
        assert_eq!(progress.complete_stage(FileStage::Write, 4), 3);
        assert_eq!(progress.completed_files(), 1);

        progress.start_file(Path::new("week2.csv"));
        assert_eq!(progress.complete_stage(FileStage::Read, 6), 4);
        assert_eq!(progress.completed_files(), 1);
        assert_eq!(progress.complete_stage(FileStage::Analyze, 6), 5);
        assert_eq!(progress.complete_stage(FileStage::Write, 6), 6);
        assert_eq!(progress.completed_files(), 2);

        progress.finish();
        assert_eq!(progress.completed_files(), 2);
    }

    // Tests a file that fails after reading leaves the bar mid-file
    // Verified by jumping straight to the file's final position on start
    #[test]
    fn test_partial_file_progress() {
        let progress = ProgressManager::hidden(3);

        progress.start_file(Path::new("prices.csv"));
        assert_eq!(progress.complete_stage(FileStage::Read, 10), 1);

        assert_eq!(progress.completed_files(), 0);
    }

    // Tests the stage order and labels shown beside the bar
    // Verified by listing the write stage before analysis
    #[test]
    fn test_stage_order() {
        assert_eq!(
            FileStage::ALL,
            [FileStage::Read, FileStage::Analyze, FileStage::Write]
        );
        assert_eq!(FileStage::Read.label(), "read");
        assert_eq!(FileStage::Analyze.label(), "analysed");
        assert_eq!(FileStage::Write.label(), "written");
    }

    // Tests an empty batch can be finished without advancing
    // Verified by dividing by the file count when reporting completed files
    #[test]
    fn test_empty_batch() {
        let progress = ProgressManager::new(0);

        progress.finish();
        assert_eq!(progress.completed_files(), 0);
    }

    // Tests a path without a file name is accepted as the current file
    // Verified by unwrapping the file name
    #[test]
    fn test_start_file_without_name() {
        let progress = ProgressManager::hidden(1);

        progress.start_file(Path::new("/"));
        assert_eq!(progress.complete_stage(FileStage::Read, 0), 1);
    }
}
