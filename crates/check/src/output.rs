use std::io::Write;

use sapcc_core::report::EntityReport;

use crate::config::OutputFormat;

/// Write entity reports in the requested format.
pub fn render<W: Write>(
    format: OutputFormat,
    reports: &[EntityReport],
    out: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => {
            for entity in reports {
                writeln!(out, "{}", entity.check_line())?;
            }
        }
        OutputFormat::Json => {
            for report in reports.iter().flat_map(|e| &e.reports) {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sapcc_core::defaults::default_set;
    use sapcc_core::evaluator::{Evaluator, Sample};

    use super::*;

    fn reports() -> Vec<EntityReport> {
        let samples = vec![Sample {
            entity_id: "SA1".to_string(),
            metric: "tunnel-connections".to_string(),
            value: 35.0,
            timestamp: Utc::now(),
        }];
        Evaluator::new(default_set()).report_batch(&samples).unwrap()
    }

    #[test]
    fn text_writes_one_line_per_entity() {
        let mut out = Vec::new();
        render(OutputFormat::Text, &reports(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "1 \"Subaccount SA1\" tunnel-connections=35;30;40 tunnel-connections: 35 (warn at or above 30)(!)\n"
        );
    }

    #[test]
    fn json_writes_one_object_per_sample() {
        let mut out = Vec::new();
        render(OutputFormat::Json, &reports(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["entity_id"], "SA1");
        assert_eq!(parsed["verdict"], "warn");
        assert_eq!(parsed["sample_value"], 35.0);
        assert_eq!(parsed["rule"]["bounds"]["warn_high"], 30.0);
        assert_eq!(parsed["breach"]["side"], "high");
    }
}
