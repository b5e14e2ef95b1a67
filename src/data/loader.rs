//! CSV loading for mixed-type datasets.
//!
//! The first record holds one type tag per feature column (`boolean`,
//! `categorical` or `continuous`); the last column of every other record is
//! the label. Categorical strings are mapped to dense codes per column in
//! first-seen order.
use super::dataset::{Dataset, FeatureType};
use crate::error::{Result, TreeError};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

pub fn read_csv<P: AsRef<Path>>(file_path: P, has_headers: bool) -> Result<Dataset<f64>> {
    let reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file_path)?;
    read_records(reader)
}

pub fn read_csv_from<R: Read>(input: R, has_headers: bool) -> Result<Dataset<f64>> {
    let reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);
    read_records(reader)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset<f64>> {
    let mut records = reader.records();

    let type_record = records
        .next()
        .ok_or_else(|| TreeError::Parse("Missing feature type row".into()))??;
    let types = type_record
        .iter()
        .map(str::parse::<FeatureType>)
        .collect::<Result<Vec<_>>>()?;

    let mut category_codes: Vec<HashMap<String, usize>> = vec![HashMap::new(); types.len()];
    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (line, result) in records.enumerate() {
        let record = result?;
        if record.len() != types.len() + 1 {
            return Err(TreeError::ShapeMismatch(format!(
                "record {} has {} fields, expected {} features and a label",
                line + 1,
                record.len(),
                types.len()
            )));
        }
        features.push(parse_row(&record, &types, &mut category_codes)?);

        let label = record
            .get(types.len())
            .ok_or_else(|| TreeError::Parse(format!("Missing label in record {}", line + 1)))?;
        labels.push(parse_bool(label)?);
    }

    Dataset::from_rows(&features, labels, types)
}

fn parse_row(
    record: &StringRecord,
    types: &[FeatureType],
    category_codes: &mut [HashMap<String, usize>],
) -> Result<Vec<f64>> {
    types
        .iter()
        .zip(record.iter())
        .zip(category_codes.iter_mut())
        .map(|((feature_type, field), codes)| match feature_type {
            FeatureType::Boolean => parse_bool(field).map(|b| if b { 1.0 } else { 0.0 }),
            FeatureType::Continuous => match field.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                Ok(_) => Err(TreeError::Parse(format!("'{}' is not a finite number", field))),
                Err(e) => Err(TreeError::Parse(format!("'{}': {}", field, e))),
            },
            FeatureType::Categorical => {
                let next = codes.len();
                Ok(*codes.entry(field.to_string()).or_insert(next) as f64)
            }
        })
        .collect()
}

fn parse_bool(field: &str) -> Result<bool> {
    match field.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        other => Err(TreeError::Parse(format!("'{}' is not a boolean", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_mixed_columns() {
        let input = "\
continuous,categorical,boolean
0.5,red,1,true
1.5,blue,0,false
2.5,red,0,1
";
        let dataset = read_csv_from(input.as_bytes(), false).unwrap();
        assert_eq!(
            dataset.types,
            vec![
                FeatureType::Continuous,
                FeatureType::Categorical,
                FeatureType::Boolean
            ]
        );
        assert_eq!(dataset.row(0), vec![0.5, 0.0, 1.0]);
        assert_eq!(dataset.row(1), vec![1.5, 1.0, 0.0]);
        assert_eq!(dataset.row(2), vec![2.5, 0.0, 0.0]);
        assert_eq!(dataset.y, vec![true, false, true]);
    }

    #[test]
    fn test_read_with_header_line() {
        let input = "\
length,label
continuous
3.0,no
";
        let dataset = read_csv_from(input.as_bytes(), true).unwrap();
        assert_eq!(dataset.nrows(), 1);
        assert_eq!(dataset.y, vec![false]);
    }

    #[test]
    fn test_read_bad_label() {
        let input = "continuous\n1.0,maybe\n";
        let result = read_csv_from(input.as_bytes(), false);
        assert!(matches!(result, Err(TreeError::Parse(_))));
    }

    #[test]
    fn test_read_rejects_non_finite_values() {
        for value in ["NaN", "inf", "-infinity"] {
            let input = format!("continuous\n0.5,1\n{},0\n", value);
            let result = read_csv_from(input.as_bytes(), false);
            assert!(matches!(result, Err(TreeError::Parse(_))), "{} was accepted", value);
        }
    }

    #[test]
    fn test_read_bad_type_row() {
        let input = "ordinal\n1.0,1\n";
        assert!(read_csv_from(input.as_bytes(), false).is_err());
    }
}
