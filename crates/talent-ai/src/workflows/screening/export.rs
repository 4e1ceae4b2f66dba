use std::io;

use super::repository::TableView;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode csv row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] io::Error),
}

/// Write table-view rows as CSV with a header row.
pub fn write_table_csv<W: io::Write>(writer: W, rows: &[TableView]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::repository::CandidateId;
    use crate::workflows::screening::role::RoleId;

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![TableView {
            candidate_id: CandidateId("cand-7".to_string()),
            role_id: RoleId("backend".to_string()),
            status: "QUALIFIED",
            overall_score: 84,
            match_level: "STRONG",
            decision_rationale: "qualified with score 84 (strong)".to_string(),
        }];

        let mut buffer = Vec::new();
        write_table_csv(&mut buffer, &rows).expect("csv written");
        let output = String::from_utf8(buffer).expect("utf8");

        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("candidate_id,role_id,status,overall_score,match_level,decision_rationale")
        );
        assert_eq!(
            lines.next(),
            Some("cand-7,backend,QUALIFIED,84,STRONG,qualified with score 84 (strong)")
        );
    }
}
