//! Columnar and gridded data includes.
//!
//! Both readers flatten a data file into one mapping from variable name to
//! the variable's values. Coordinate variables come first, data variables
//! after them, all in the same flat mapping.

use crate::{ParserError, Result};
use awesio_core::Document;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Reads a CSV file into `{column_name: [values...]}`.
///
/// The header row names the variables. Each cell becomes an integer, else a
/// float, else a string; an empty cell becomes null. Rows shorter than the
/// header leave the remaining columns short as well.
pub fn read_csv(path: &Path) -> Result<Document> {
    let file = File::open(path).map_err(|e| ParserError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| ParserError::columnar(path, e.to_string()))?
        .clone();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| ParserError::columnar(path, e.to_string()))?;
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            column.push(parse_cell(cell));
        }
    }

    debug!(
        "Read {} columns from {}",
        headers.len(),
        path.display()
    );

    let mut variables = Map::new();
    for (name, values) in headers.iter().zip(columns) {
        variables.insert(name.to_string(), Value::Array(values));
    }
    Ok(Value::Object(variables))
}

fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(number) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(cell.to_string())
}

/// Reshapes a flat row-major buffer into nested lists following `dims`.
///
/// Zero dimensions yield the single scalar.
#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
fn reshape(values: &[f64], dims: &[usize]) -> Value {
    match dims.split_first() {
        None => values.first().copied().map(float_value).unwrap_or(Value::Null),
        Some((_, rest)) if rest.is_empty() => {
            Value::Array(values.iter().copied().map(float_value).collect())
        }
        Some((&len, rest)) => {
            let stride: usize = rest.iter().product();
            Value::Array(
                (0..len)
                    .map(|i| {
                        let start = (i * stride).min(values.len());
                        let end = ((i + 1) * stride).min(values.len());
                        reshape(&values[start..end], rest)
                    })
                    .collect(),
            )
        }
    }
}

/// Missing values (NaN fill) have no document representation and become null.
#[cfg_attr(not(feature = "netcdf"), allow(dead_code))]
fn float_value(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// Reads a netCDF file into `{variable_name: values}`.
///
/// A coordinate variable is a one-dimensional variable named like its
/// dimension; these are emitted before the data variables. Multi-dimensional
/// variables become nested lists, scalars stay scalars.
#[cfg(feature = "netcdf")]
pub fn read_netcdf(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(ParserError::NotFound(path.to_path_buf()));
    }
    let file = netcdf::open(path).map_err(|e| ParserError::columnar(path, e.to_string()))?;

    let mut coordinates = Map::new();
    let mut data = Map::new();
    for variable in file.variables() {
        let name = variable.name();
        let dims: Vec<usize> = variable.dimensions().iter().map(|d| d.len()).collect();
        let is_coordinate = variable.dimensions().len() == 1
            && variable.dimensions()[0].name() == name;

        let values = variable
            .get_values::<f64, _>(..)
            .map_err(|e| ParserError::columnar(path, format!("variable '{name}': {e}")))?;
        let value = reshape(&values, &dims);

        if is_coordinate {
            coordinates.insert(name, value);
        } else {
            data.insert(name, value);
        }
    }

    debug!(
        "Read {} coordinate and {} data variables from {}",
        coordinates.len(),
        data.len(),
        path.display()
    );

    coordinates.extend(data);
    Ok(Value::Object(coordinates))
}

/// netCDF support is compiled out; `.nc` includes are rejected.
#[cfg(not(feature = "netcdf"))]
pub fn read_netcdf(path: &Path) -> Result<Document> {
    Err(ParserError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: ".nc (build with the `netcdf` feature)".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_csv_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "altitude_m, u_normalized, label").unwrap();
        writeln!(file, "100, 0.5, low").unwrap();
        writeln!(file, "200, 0.75,").unwrap();
        file.flush().unwrap();

        let doc = read_csv(file.path()).unwrap();
        assert_eq!(
            doc,
            json!({
                "altitude_m": [100, 200],
                "u_normalized": [0.5, 0.75],
                "label": ["low", null],
            })
        );
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["altitude_m", "u_normalized", "label"]);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, ParserError::NotFound(_)));
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("42"), json!(42));
        assert_eq!(parse_cell("-1.5e3"), json!(-1500.0));
        assert_eq!(parse_cell("NaN"), json!("NaN"));
        assert_eq!(parse_cell(""), Value::Null);
    }

    #[test]
    fn test_reshape() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(
            reshape(&values, &[2, 3]),
            json!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
        );
        assert_eq!(reshape(&values[..1], &[]), json!(1.0));
        assert_eq!(reshape(&[f64::NAN], &[1]), json!([null]));
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_netcdf_disabled() {
        let err = read_netcdf(Path::new("grid.nc")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat { .. }));
    }
}
