use crate::model::ConfigMap;
use chrono::NaiveDateTime;

/// Timestamp format of the `# Generated on` header line
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a configuration map as `.env` text
///
/// Output is two comment header lines, a blank line, then one `KEY=VALUE`
/// line per entry in ascending key order. Values containing a space, `#`
/// or `=` are wrapped in double quotes as-is; embedded quotes are not
/// escaped.
///
/// # Arguments
/// * `project` - Project name for the header
/// * `config` - Entries to export; `None` renders the header only
/// * `generated_at` - Timestamp for the header
pub fn render_env(
    project: &str,
    config: Option<&ConfigMap>,
    generated_at: NaiveDateTime,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Configuration for {}\n", project));
    output.push_str(&format!(
        "# Generated on {}\n",
        generated_at.format(GENERATED_AT_FORMAT)
    ));
    output.push('\n');

    if let Some(config) = config {
        for (key, value) in config.iter() {
            output.push_str(key);
            output.push('=');
            output.push_str(&quote_value(value));
            output.push('\n');
        }
    }

    output
}

fn quote_value(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ' ' | '#' | '=')) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_render_header_only_when_absent() {
        let out = render_env("billing", None, ts());
        assert_eq!(
            out,
            "# Configuration for billing\n# Generated on 2024-03-09 14:05:07\n\n"
        );
    }

    #[test]
    fn test_render_sorted_and_quoted() {
        let config: ConfigMap = [("B_KEY", "1"), ("A_KEY", "has space")]
            .into_iter()
            .collect();
        let out = render_env("api", Some(&config), ts());
        let body: Vec<&str> = out.lines().skip(3).collect();
        assert_eq!(body, vec!["A_KEY=\"has space\"", "B_KEY=1"]);
    }

    #[test]
    fn test_quote_rules() {
        assert_eq!(quote_value("plain"), "plain");
        assert_eq!(quote_value("a#b"), "\"a#b\"");
        assert_eq!(quote_value("k=v"), "\"k=v\"");
        assert_eq!(quote_value("say \"hi\" there"), "\"say \"hi\" there\"");
        assert_eq!(quote_value(""), "");
        // tabs are not a quoting trigger
        assert_eq!(quote_value("a\tb"), "a\tb");
    }
}
