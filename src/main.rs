// Entry point and interactive menu.
//
// - Option [1] loads the CSV and prints column diagnostics.
// - Option [2] cleans and analyzes the loaded table, prints previews and
//   writes the derived tables plus a JSON summary.
// - Option [3] saves the cleaned table (or the raw one if no analysis ran).
use anyhow::Result;
use clap::Parser;
use housing_report::output::{preview_table_rows, write_csv, write_json, write_table};
use housing_report::reports::{generate_summary, nearest_rows, summary_rows, trend_rows};
use housing_report::util::{format_int, format_number};
use housing_report::{
    analyze, column_info, load_path, Analysis, AnalysisConfig, AnalysisError, Table,
};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "California housing data analytics",
    long_about = "Cleans a housing CSV and derives value statistics, value by age, \
                  value near reference cities and a normalized distance map table."
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long, default_value = "housing.csv")]
    input: PathBuf,

    /// Directory for generated reports (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON config file with column names and options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

// Loaded data survives across menu choices so a file is read once but can be
// analyzed and saved several times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    input: PathBuf,
    config: AnalysisConfig,
    data: Option<Table>,
    analysis: Option<Analysis>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` for `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_line("Back to menu (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [1]: load the CSV and show what each column holds.
fn handle_load() -> housing_report::Result<()> {
    let (input, options) = {
        let st = state();
        (st.input.clone(), st.config.load.clone())
    };
    let table = load_path(&input, &options)?;
    println!(
        "Data has been uploaded successfully ({} rows, {} columns)\n",
        format_int(table.row_count()),
        table.columns().len()
    );
    preview_table_rows(&column_info(&table), usize::MAX);

    let mut st = state();
    st.data = Some(table);
    st.analysis = None;
    Ok(())
}

/// Option [2]: clean, analyze, preview and write the derived tables.
fn handle_analyze() -> housing_report::Result<()> {
    let (data, config) = {
        let st = state();
        (st.data.clone(), st.config.clone())
    };
    let data = data.ok_or(AnalysisError::NoDataLoaded)?;
    let analysis = analyze(&data, &config)?;
    let report = &analysis.clean_report;

    println!("1. Missing values per column");
    preview_table_rows(&report.nulls_before, usize::MAX);
    println!(
        "Deleted {} rows containing missing values.\n",
        format_int(report.rows_with_nulls())
    );
    println!(
        "2. Number of duplicate records: {}",
        format_int(report.duplicates_before)
    );
    println!(
        "Number of duplicate records after removal: {}\n",
        format_int(report.duplicates_after)
    );

    println!("Summary statistics");
    preview_table_rows(&summary_rows(&analysis.column_summaries), usize::MAX);
    let s = &analysis.value_summary;
    println!("Mean value of {}: {}", analysis.value_column, format_number(s.mean, 2));
    println!("Median value of {}: {}", analysis.value_column, format_number(s.median, 2));
    println!(
        "Standard deviation of {}: {}\n",
        analysis.value_column,
        format_number(s.std_dev, 2)
    );

    let trend = trend_rows(&analysis.age_trend);
    let file1 = config.output_path("age_value_trend.csv");
    write_csv(&file1, &trend)?;
    println!("Average value by {}", analysis.age_trend.group_column);
    preview_table_rows(&trend, 5);
    println!("(Full table exported to {})\n", file1.display());

    let nearest = nearest_rows(&analysis.nearest);
    let file2 = config.output_path("nearest_city_values.csv");
    write_csv(&file2, &nearest)?;
    println!("Average value nearest each reference point");
    preview_table_rows(&nearest, nearest.len());
    println!("(Full table exported to {})\n", file2.display());

    println!(
        "{} income/value/population points",
        format_int(analysis.bubbles.len())
    );

    let file3 = config.output_path("distance_map.csv");
    write_table(&file3, &analysis.map.table, config.load.delimiter)?;
    match analysis.map.center() {
        Some((lat, lon)) => println!(
            "Distance map: {} rows centered at ({:.4}, {:.4})",
            format_int(analysis.map.table.row_count()),
            lat,
            lon
        ),
        None => warn!("Distance map has no numeric coordinates"),
    }
    println!("(Full table exported to {})\n", file3.display());

    let summary = generate_summary(&analysis);
    let file4 = config.output_path("analysis_summary.json");
    write_json(&file4, &summary)?;
    println!("Summary saved to {}\n", file4.display());

    state().analysis = Some(analysis);
    Ok(())
}

/// Option [3]: save the cleaned table.
fn handle_save() -> housing_report::Result<()> {
    let st = state();
    let table = match (&st.analysis, &st.data) {
        (Some(analysis), _) => &analysis.cleaned,
        (None, Some(data)) => {
            warn!("No analysis run yet, saving the table as loaded");
            data
        }
        (None, None) => return Err(AnalysisError::NoDataLoaded),
    };
    let path = st.config.output_path(&st.config.results_file);
    write_table(&path, table, st.config.load.delimiter)?;
    println!("The analysis results have been saved. {}\n", path.display());
    Ok(())
}

fn report_error(e: &AnalysisError) {
    error!(code = e.error_code(), "{}", e);
    eprintln!("Error: {}\n", e);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    std::fs::create_dir_all(&config.output_dir)?;
    {
        let mut st = state();
        st.input = args.input;
        st.config = config;
    }

    println!("California Housing Data Analytics Tool\n");
    loop {
        println!("[1] Load the file");
        println!("[2] Analyze data");
        println!("[3] Save analysis results\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        let outcome = match choice.as_str() {
            "1" => handle_load(),
            "2" => {
                println!();
                if let Err(e) = handle_analyze() {
                    report_error(&e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
                Ok(())
            }
            "3" => handle_save(),
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
                Ok(())
            }
        };
        if let Err(e) = outcome {
            report_error(&e);
        }
    }
    Ok(())
}
