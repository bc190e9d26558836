use crate::calc::synthesize;
use crate::data::{Selection, SlotKey};
use anyhow::Result;

pub fn run(slots: &[SlotKey]) -> Result<()> {
    write_summary(slots, &mut std::io::stdout())
}

/// Duplicate slots collapse, exactly as repeated selection would.
pub(crate) fn write_summary<W: std::io::Write>(slots: &[SlotKey], out: &mut W) -> Result<()> {
    let selection: Selection = slots.iter().copied().collect();
    if selection.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", synthesize(selection.iter()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn slots(raw: &[&str]) -> Vec<SlotKey> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn render(raw: &[&str]) -> String {
        let mut buf = Vec::new();
        write_summary(&slots(raw), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_summary_merges_runs() {
        let out = render(&[
            "2024-10-18T09:00",
            "2024-10-18T10:00",
            "2024-10-18T11:00",
            "2024-10-18T14:00",
            "2024-10-18T15:00",
        ]);
        assert_eq!(out, "10月18日(金) 9:00-12:00 14:00-16:00\n");
    }

    #[test]
    fn test_write_summary_orders_dates() {
        let out = render(&["2024-10-20T13:00", "2024-10-18T13:00"]);
        assert_eq!(out, "10月18日(金) 13:00-14:00\n10月20日(日) 13:00-14:00\n");
    }

    #[test]
    fn test_write_summary_ignores_duplicates() {
        let out = render(&["2024-10-18T13:00", "2024-10-18T13:00"]);
        assert_eq!(out, "10月18日(金) 13:00-14:00\n");
    }
}
