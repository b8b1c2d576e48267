use crate::error::{ConverterError, ConverterResult};
use crate::excel::{ConverterOptions, SpreadsheetConverter, WorkbookReader};
use crate::node::{description, ExcelConverterNode, Item, StaticContext};
use crate::types::RecordSet;
use colored::Colorize;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> ConverterResult<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Execute the convert command
pub fn convert(
    input: PathBuf,
    output: PathBuf,
    worksheet: String,
    allow_empty: bool,
    verbose: bool,
) -> ConverterResult<()> {
    println!("{}", "📊 Excel Converter - Convert".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Parsing JSON input...".cyan());
    }

    let text = read_input(&input)?;
    let records = RecordSet::parse(&text)?;

    let converter = SpreadsheetConverter::new(ConverterOptions {
        allow_empty,
        ..ConverterOptions::default()
    });

    if verbose {
        let schema = converter.infer_schema(&records)?;
        let columns: Vec<&str> = schema.names().collect();
        println!("   Found {} rows", records.len());
        println!("   Columns: {}\n", columns.join(", ").bright_blue());
        println!("{}", "📝 Writing workbook...".cyan());
    }

    let bytes = converter.convert_to_file(&records, &worksheet, &output)?;

    println!("{}", "✅ Conversion Complete!".bold().green());
    println!("   Worksheet: {}", worksheet);
    println!("   Rows:      {}", records.len());
    println!("   Size:      {} bytes\n", bytes);

    Ok(())
}

/// Execute the run command: the node over an execution request
pub fn run(
    request: PathBuf,
    output: Option<PathBuf>,
    extract_dir: Option<PathBuf>,
    continue_on_fail: bool,
    verbose: bool,
) -> ConverterResult<()> {
    let text = read_input(&request)?;
    let mut ctx: StaticContext = serde_json::from_str(&text)?;
    if continue_on_fail {
        ctx.continue_on_fail = true;
    }

    if verbose {
        eprintln!(
            "{} {} item(s), continue on fail: {}",
            "▶ Running node on".cyan(),
            ctx.items.len(),
            ctx.continue_on_fail
        );
    }

    let items = ExcelConverterNode::new().execute(&ctx)?;

    let failed = items.iter().filter(|item| !item.is_success()).count();
    if failed > 0 {
        eprintln!(
            "{}",
            format!("⚠️  {} of {} item(s) failed", failed, items.len()).yellow()
        );
    }

    if let Some(dir) = extract_dir {
        let written = extract_attachments(&items, &dir)?;
        for path in &written {
            eprintln!("   {} {}", "wrote".green(), path.display());
        }
    }

    let json = serde_json::to_string_pretty(&items)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!(
                "{} {} item(s) → {}",
                "✅".green(),
                items.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Decode every binary attachment into `dir`, returning the written paths
pub fn extract_attachments(items: &[Item], dir: &Path) -> ConverterResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(binary) = &item.binary else {
            continue;
        };
        for attachment in binary.values() {
            // Never let a host-supplied name escape the target directory
            let base = Path::new(&attachment.file_name)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    ConverterError::InvalidParameter(format!(
                        "Unusable file name '{}'",
                        attachment.file_name
                    ))
                })?;
            let file_name = if items.len() > 1 {
                format!("{}_{}", index, base)
            } else {
                base
            };

            let path = dir.join(file_name);
            std::fs::write(&path, attachment.decode()?)?;
            written.push(path);
        }
    }

    Ok(written)
}

/// Execute the inspect command: print worksheets as JSON rows
pub fn inspect(input: PathBuf, sheet: Option<String>) -> ConverterResult<()> {
    let sheets = WorkbookReader::open(&input)?.read_all()?;

    let mut document = Map::new();
    for data in sheets {
        if sheet.as_deref().is_some_and(|wanted| wanted != data.name) {
            continue;
        }
        let rows = data.rows.into_iter().map(Value::Object).collect();
        document.insert(data.name, Value::Array(rows));
    }

    if let Some(wanted) = sheet {
        if document.is_empty() {
            return Err(ConverterError::Import(format!(
                "Worksheet '{}' not found in {}",
                wanted,
                input.display()
            )));
        }
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(document))?);
    Ok(())
}

/// Execute the describe command
pub fn describe() -> ConverterResult<()> {
    println!("{}", serde_json::to_string_pretty(description())?);
    Ok(())
}
