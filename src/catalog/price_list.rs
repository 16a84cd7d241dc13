use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

/// One validated row from a vendor's price list.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub name: String,
    pub price: f64,
}

/// Parse a two-column (name, price) price list. The first row is a header
/// and is skipped. Rows with an empty name or a missing/non-numeric price
/// are skipped rather than failing the whole file; comma decimal separators
/// are tolerated ("79,90" parses as 79.90).
pub fn parse_price_list(path: &Path) -> Result<Vec<PriceRow>> {
    if !path.exists() {
        return Err(anyhow::anyhow!("price list not found at: {:?}", path));
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open price list at {:?}", path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("failed to read record at row index {}", row_index))?;

        let name = match record.get(0) {
            Some(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => continue,
        };
        let Some(price) = record
            .get(1)
            .and_then(|raw| raw.trim().replace(',', ".").parse::<f64>().ok())
        else {
            tracing::debug!("skipping row {}: unparsable price", row_index);
            continue;
        };
        if price < 0.0 {
            tracing::debug!("skipping row {}: negative price", row_index);
            continue;
        }

        rows.push(PriceRow { name, price });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_price_list() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Name,Price")?;
        writeln!(file, "Milk,79.90")?;
        writeln!(file, "Bread,\"45,50\"")?;
        writeln!(file, "Cheese,not a number")?;
        writeln!(file, ",12.00")?;
        writeln!(file, "Butter,")?;
        writeln!(file, "Loss Leader,-5")?;
        writeln!(file, "Free Sample,0")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_parse_price_list_skips_invalid_rows() -> Result<()> {
        let file = create_test_price_list()?;
        let rows = parse_price_list(file.path())?;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], PriceRow { name: "Milk".to_string(), price: 79.90 });
        // Comma decimal separator is normalized.
        assert_eq!(rows[1], PriceRow { name: "Bread".to_string(), price: 45.50 });
        assert_eq!(rows[2], PriceRow { name: "Free Sample".to_string(), price: 0.0 });
        Ok(())
    }

    #[test]
    fn test_parse_price_list_header_only() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Name,Price")?;
        file.flush()?;
        let rows = parse_price_list(file.path())?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_price_list_file_not_found() {
        let result = parse_price_list(Path::new("this_file_does_not_exist.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("price list not found"));
    }
}
