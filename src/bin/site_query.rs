// site_query.rs - Standalone utility for querying a per-column conservation table

use clap::{Arg, ArgAction, Command};

use consanalyzer::core::Classification;
use consanalyzer::output::{read_column_table, ColumnRow};

/// Row filter applied to a column table
#[derive(Debug, Clone, Default)]
struct SiteQuery {
    from: Option<usize>,
    to: Option<usize>,
    max_p: Option<f64>,
    adjusted: bool,
    classification: Option<Classification>,
}

impl SiteQuery {
    fn matches(&self, row: &ColumnRow) -> bool {
        if self.from.is_some_and(|from| row.position < from) {
            return false;
        }
        if self.to.is_some_and(|to| row.position > to) {
            return false;
        }
        if let Some(max_p) = self.max_p {
            let p = if self.adjusted {
                row.adjusted_p_value
            } else {
                row.p_value
            };
            if p > max_p {
                return false;
            }
        }
        if let Some(class) = self.classification {
            if row.classification != class {
                return false;
            }
        }
        true
    }

    fn select<'a>(&self, rows: &'a [ColumnRow]) -> Vec<&'a ColumnRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

fn parse_classification(value: &str) -> Result<Classification, String> {
    match value.to_lowercase().as_str() {
        "conserved" => Ok(Classification::Conserved),
        "mutated" => Ok(Classification::Mutated),
        "neutral" => Ok(Classification::Neutral),
        _ => Err(format!(
            "Invalid class: {}. Use: conserved, mutated, neutral",
            value
        )),
    }
}

fn parse_optional<T: std::str::FromStr>(
    matches: &clap::ArgMatches,
    name: &str,
) -> Result<Option<T>, String> {
    matches
        .get_one::<String>(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| format!("Invalid {} value: {}", name, value))
        })
        .transpose()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let matches = Command::new("Site Query")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Filters a consanalyzer per-column table by position, p-value and class")
        .arg(Arg::new("table")
            .long("table")
            .value_name("FILE")
            .help("Path to a <output>.columns.tsv or .csv table")
            .required(true))
        .arg(Arg::new("from")
            .long("from")
            .value_name("POSITION")
            .help("First 1-based alignment position to report"))
        .arg(Arg::new("to")
            .long("to")
            .value_name("POSITION")
            .help("Last 1-based alignment position to report"))
        .arg(Arg::new("max-p")
            .long("max-p")
            .value_name("P")
            .help("Report only columns with p-value at most P"))
        .arg(Arg::new("adjusted")
            .long("adjusted")
            .action(ArgAction::SetTrue)
            .help("Apply --max-p to the Benjamini-Hochberg adjusted p-value"))
        .arg(Arg::new("class")
            .long("class")
            .value_name("CLASS")
            .help("Report only conserved, mutated or neutral columns"))
        .get_matches();

    let table_path = matches
        .get_one::<String>("table")
        .ok_or("--table is required")?;

    let query = SiteQuery {
        from: parse_optional(&matches, "from")?,
        to: parse_optional(&matches, "to")?,
        max_p: parse_optional(&matches, "max-p")?,
        adjusted: matches.get_flag("adjusted"),
        classification: matches
            .get_one::<String>("class")
            .map(|value| parse_classification(value))
            .transpose()?,
    };

    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(format!("--from {} is after --to {}", from, to));
        }
    }

    let rows = read_column_table(table_path)?;
    let selected = query.select(&rows);

    println!("Position\tResidue\tConservation_Rate\tClassification\tP_Value\tAdjusted_P_Value");
    for row in &selected {
        println!(
            "{}\t{}\t{:.4}\t{}\t{:.4e}\t{:.4e}",
            row.position,
            row.residue,
            row.conservation_rate,
            row.classification,
            row.p_value,
            row.adjusted_p_value
        );
    }
    eprintln!("🔎 {} of {} columns matched", selected.len(), rows.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(position: usize, classification: Classification, p: f64, adjusted: f64) -> ColumnRow {
        ColumnRow {
            position,
            residue: 'A',
            match_count: 1,
            depth: 1,
            conservation_rate: 1.0,
            classification,
            p_value: p,
            adjusted_p_value: adjusted,
        }
    }

    fn rows() -> Vec<ColumnRow> {
        vec![
            row(1, Classification::Conserved, 0.001, 0.004),
            row(2, Classification::Neutral, 0.2, 0.3),
            row(3, Classification::Mutated, 0.9, 0.9),
            row(4, Classification::Conserved, 0.01, 0.06),
        ]
    }

    fn positions(selected: &[&ColumnRow]) -> Vec<usize> {
        selected.iter().map(|r| r.position).collect()
    }

    #[test]
    fn test_position_range() {
        let query = SiteQuery {
            from: Some(2),
            to: Some(3),
            ..SiteQuery::default()
        };
        assert_eq!(positions(&query.select(&rows())), vec![2, 3]);
    }

    #[test]
    fn test_p_value_filter() {
        let mut query = SiteQuery {
            max_p: Some(0.05),
            ..SiteQuery::default()
        };
        assert_eq!(positions(&query.select(&rows())), vec![1, 4]);

        query.adjusted = true;
        assert_eq!(positions(&query.select(&rows())), vec![1]);
    }

    #[test]
    fn test_class_filter() {
        let query = SiteQuery {
            classification: Some(parse_classification("Conserved").unwrap()),
            ..SiteQuery::default()
        };
        assert_eq!(positions(&query.select(&rows())), vec![1, 4]);
        assert!(parse_classification("variable").is_err());
    }
}
