use clap::{Parser, Subcommand};
use excel_converter::cli;
use excel_converter::error::ConverterResult;
use excel_converter::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "excel-converter")]
#[command(about = "Turn arrays of JSON objects into .xlsx spreadsheets.")]
#[command(long_about = "Excel Converter - JSON arrays to .xlsx

Columns come from the first object's keys, in order. Later objects are
matched by key: missing keys leave blank cells, extra keys are dropped.

COMMANDS:
  convert   - Convert a JSON array file to .xlsx
  run       - Run the workflow node on an execution request
  inspect   - Print the worksheets of an .xlsx file as JSON rows
  describe  - Print the node description

EXAMPLES:
  excel-converter convert rows.json rows.xlsx
  cat rows.json | excel-converter convert - rows.xlsx --worksheet Orders
  excel-converter run request.json --extract-dir out/
  excel-converter inspect rows.xlsx")]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert a JSON array of objects to an .xlsx workbook.

The input must be an array whose elements are all objects. An empty
array is rejected unless --allow-empty is given, in which case the
worksheet has no header and no rows.

EXAMPLE:
  excel-converter convert orders.json orders.xlsx --worksheet Orders")]
    /// Convert a JSON array file to .xlsx
    Convert {
        /// Path to the JSON file (`-` reads stdin)
        input: PathBuf,

        /// Output Excel file path (.xlsx)
        output: PathBuf,

        /// Worksheet name
        #[arg(short, long, default_value = "Sheet1")]
        worksheet: String,

        /// Write an empty worksheet instead of failing on `[]`
        #[arg(long)]
        allow_empty: bool,
    },

    #[command(long_about = "Run the Excel Converter node on an execution request.

REQUEST FORMAT:
  {
    \"items\": [{\"json\": {\"data\": [{\"a\": 1}]}}],
    \"parameters\": {\"inputMode\": \"nativeArray\", \"inputField\": \"data\"},
    \"itemParameters\": [],
    \"continueOnFail\": false
  }

PARAMETERS:
  inputMode           jsonString (default) | nativeArray
  inputField          JSON text, or the item field holding the array (json.data)
  worksheetName       Sheet1
  binaryPropertyName  data
  fileName            data.xlsx
  allowEmpty          false
  outputLayout        perItem (default) | combined

Result items are printed as JSON (or written with --output).")]
    /// Run the workflow node on an execution request
    Run {
        /// Path to the request JSON (`-` reads stdin)
        request: PathBuf,

        /// Write result items here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decode binary attachments into this directory
        #[arg(short, long)]
        extract_dir: Option<PathBuf>,

        /// Capture per-item failures instead of aborting
        #[arg(long)]
        continue_on_fail: bool,
    },

    /// Print the worksheets of an .xlsx file as JSON rows
    Inspect {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Only print this worksheet
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Print the node description as JSON
    Describe,
}

fn main() -> ConverterResult<()> {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            worksheet,
            allow_empty,
        } => cli::convert(input, output, worksheet, allow_empty, cli.verbose),

        Commands::Run {
            request,
            output,
            extract_dir,
            continue_on_fail,
        } => cli::run(request, output, extract_dir, continue_on_fail, cli.verbose),

        Commands::Inspect { input, sheet } => cli::inspect(input, sheet),

        Commands::Describe => cli::describe(),
    }
}
