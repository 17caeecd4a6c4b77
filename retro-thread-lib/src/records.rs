use anyhow::{anyhow, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

/// One line of the games list: a title and the platform it ran on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub title: String,
    pub platform: String,
}

/// Parse a `title,platform` line.
///
/// # Example
/// ```
/// use retro_thread_lib::records::parse_record;
/// let record = parse_record("Zork,Apple II").unwrap();
/// assert_eq!(record.title, "Zork");
/// assert_eq!(record.platform, "Apple II");
/// ```
pub fn parse_record(line: &str) -> Result<GameRecord> {
    let line = line.trim();
    let fields: Vec<&str> = line.split(',').collect();

    match fields.as_slice() {
        [title, platform] => Ok(GameRecord {
            title: title.to_string(),
            platform: platform.to_string(),
        }),
        _ => Err(anyhow!(
            "Malformed record {:?}: expected \"<title>,<platform>\"",
            line
        )),
    }
}

/// Split the contents of a games list into its non-blank lines.
pub fn parse_records(text: &str) -> Vec<String> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read games list: {}", path.display()))?;
    Ok(parse_records(&text))
}

/// Pick one line uniformly at random and parse it.
pub fn pick_record<R: Rng + ?Sized>(lines: &[String], rng: &mut R) -> Result<GameRecord> {
    let line = lines
        .choose(rng)
        .ok_or_else(|| anyhow!("Games list is empty"))?;
    parse_record(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_record() {
        let record = parse_record("Zork,Apple II").unwrap();
        assert_eq!(
            record,
            GameRecord {
                title: "Zork".to_string(),
                platform: "Apple II".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_record_strips_line_ending() {
        let record = parse_record("Elite,BBC Micro\r\n").unwrap();
        assert_eq!(record.title, "Elite");
        assert_eq!(record.platform, "BBC Micro");
    }

    #[test]
    fn test_parse_record_missing_comma() {
        assert!(parse_record("Jet Set Willy").is_err());
    }

    #[test]
    fn test_parse_record_extra_comma() {
        assert!(parse_record("Lode Runner,Apple II,1983").is_err());
    }

    #[test]
    fn test_parse_records_skips_blank_lines() {
        let lines = parse_records("Zork,Apple II\n\n   \nElite,BBC Micro\n");
        assert_eq!(lines, vec!["Zork,Apple II", "Elite,BBC Micro"]);
    }

    #[test]
    fn test_pick_record_empty_list() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_record(&[], &mut rng).is_err());
    }

    #[test]
    fn test_pick_record_always_from_list() {
        let lines = parse_records("Zork,Apple II\nElite,BBC Micro\nManic Miner,ZX Spectrum\n");
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let record = pick_record(&lines, &mut rng).unwrap();
            assert!(!record.title.is_empty());
            assert!(!record.platform.is_empty());
            assert!(lines.contains(&format!("{},{}", record.title, record.platform)));
        }
    }

    #[test]
    fn test_load_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.txt");
        std::fs::write(&path, "Zork,Apple II\nElite,BBC Micro\n").unwrap();

        let lines = load_records(&path).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records("/nonexistent/games.txt").unwrap_err();
        assert!(err.to_string().contains("games.txt"));
    }
}
