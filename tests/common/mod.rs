use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// What the model returned for the reference scoresheet, misreads included.
pub const SAMPLE_TRANSCRIPTION: &str = "[Event \"International Open FIDE Rating Chess Tournament\"]
[Site \"Academy of Engineering, Pune\"]
[Date \"2024.03.31\"]
[Round \"1\"]
[White \"Shubhas Deo\"]
[WhiteElo \"1542\"]
[Black \"Hemant\"]
[BlackElo \"1935\"]
[Result \"0-1\"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. 0-0 Nf6 5. d3 d6 0-1
";

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}

/// Fresh directory under the system temp dir. Not created.
pub fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("scoresheet-it-{name}-{}", unique_suffix()))
}
