//! Node execution: items in, spreadsheet items out

use super::context::ExecutionContext;
use super::item::Item;
use super::parameters::{InputMode, NodeParameters, NodeSettings, OutputLayout, PARAM_INPUT_FIELD};
use crate::error::{ConverterError, ConverterResult};
use crate::excel::SpreadsheetConverter;
use crate::types::{ConversionRequest, ConversionResult, RecordSet};
use tracing::{debug, info, warn};

/// The Excel Converter node
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelConverterNode;

impl ExcelConverterNode {
    pub fn new() -> Self {
        Self
    }

    /// Run the node over the context's items.
    ///
    /// Per-item failures become `{success: false}` items when the context
    /// allows continuing; otherwise the first failure is returned.
    pub fn execute(&self, ctx: &dyn ExecutionContext) -> ConverterResult<Vec<Item>> {
        let settings = match NodeSettings::resolve(ctx) {
            Ok(settings) => settings,
            Err(e) => return Ok(vec![Self::capture(ctx, 0, e)?]),
        };

        let output = match (settings.input_mode, settings.output_layout) {
            (InputMode::JsonString, _) => vec![self.execute_json_string(ctx)?],
            (InputMode::NativeArray, OutputLayout::PerItem) => self.execute_per_item(ctx)?,
            (InputMode::NativeArray, OutputLayout::Combined) => self.execute_combined(ctx)?,
        };

        let failed = output.iter().filter(|item| !item.is_success()).count();
        info!(
            mode = %settings.input_mode,
            layout = %settings.output_layout,
            input_items = ctx.items().len(),
            output_items = output.len(),
            failed,
            "excel converter finished"
        );
        Ok(output)
    }

    /// Convert one request into a result, discarding any partial workbook on error
    pub fn convert(
        &self,
        request: ConversionRequest,
        params: &NodeParameters,
    ) -> ConverterResult<ConversionResult> {
        let converter = SpreadsheetConverter::new(params.converter_options());
        let data = converter.convert(&request.records, &request.worksheet_name)?;
        debug!(
            property = %request.output_property_name,
            file = %request.file_name,
            bytes = data.len(),
            "workbook attached"
        );
        Ok(ConversionResult::success(
            request.records.len(),
            data,
            request.file_name,
        ))
    }

    /// `inputField` is JSON text; a single output item regardless of input count
    fn execute_json_string(&self, ctx: &dyn ExecutionContext) -> ConverterResult<Item> {
        let params = match NodeParameters::resolve(ctx, 0) {
            Ok(params) => params,
            Err(e) => return Self::capture(ctx, 0, e),
        };
        let outcome = RecordSet::parse(&params.input_field)
            .and_then(|records| self.convert(params.request(records), &params));
        Self::finish(ctx, 0, &params, outcome)
    }

    fn execute_per_item(&self, ctx: &dyn ExecutionContext) -> ConverterResult<Vec<Item>> {
        let mut output = Vec::with_capacity(ctx.items().len());

        for (index, item) in ctx.items().iter().enumerate() {
            let params = match NodeParameters::resolve(ctx, index) {
                Ok(params) => params,
                Err(e) => {
                    output.push(Self::capture(ctx, index, e)?);
                    continue;
                }
            };
            let outcome = Self::records_from_item(item, &params.input_field)
                .and_then(|records| self.convert(params.request(records), &params));
            output.push(Self::finish(ctx, index, &params, outcome)?);
        }

        Ok(output)
    }

    /// Every item's rows in one shared worksheet; failures follow the combined item.
    ///
    /// The workbook takes its name, file name and attachment property from the
    /// first item that contributes records.
    fn execute_combined(&self, ctx: &dyn ExecutionContext) -> ConverterResult<Vec<Item>> {
        if ctx.items().is_empty() {
            return Ok(Vec::new());
        }

        let mut merged = RecordSet::default();
        let mut sheet_params: Option<NodeParameters> = None;
        let mut failures = Vec::new();

        for (index, item) in ctx.items().iter().enumerate() {
            let resolved = NodeParameters::resolve(ctx, index).and_then(|item_params| {
                Self::records_from_item(item, &item_params.input_field)
                    .map(|records| (item_params, records))
            });
            match resolved {
                Ok((item_params, records)) => {
                    debug!(index, rows = records.len(), "merged item into combined sheet");
                    merged.append(records);
                    sheet_params.get_or_insert(item_params);
                }
                Err(e) => failures.push(Self::capture(ctx, index, e)?),
            }
        }

        let params = sheet_params.unwrap_or_default();
        let outcome = self.convert(params.request(merged), &params);
        let mut output = vec![Self::finish(ctx, 0, &params, outcome)?];
        output.extend(failures);
        Ok(output)
    }

    fn records_from_item(item: &Item, field: &str) -> ConverterResult<RecordSet> {
        if field.trim().is_empty() {
            return Err(ConverterError::InvalidParameter(format!(
                "'{}' must name a field",
                PARAM_INPUT_FIELD
            )));
        }

        let value = item
            .field(field)
            .ok_or_else(|| ConverterError::Shape(format!("Field '{}' not found in item", field)))?;

        RecordSet::from_value(value.clone()).map_err(|e| match e {
            ConverterError::Shape(msg) => ConverterError::Shape(format!("Field '{}': {}", field, msg)),
            other => other,
        })
    }

    fn finish(
        ctx: &dyn ExecutionContext,
        index: usize,
        params: &NodeParameters,
        outcome: ConverterResult<ConversionResult>,
    ) -> ConverterResult<Item> {
        match outcome {
            Ok(result) => {
                debug!(index, file = %params.file_name, "item converted");
                Ok(Item::from_result(result, &params.binary_property_name))
            }
            Err(e) => Self::capture(ctx, index, e),
        }
    }

    /// Apply the continue-on-fail policy to a failed item
    fn capture(ctx: &dyn ExecutionContext, index: usize, error: ConverterError) -> ConverterResult<Item> {
        if !ctx.continue_on_fail() {
            return Err(error);
        }
        warn!(index, kind = error.kind(), error = %error, "item failed, continuing");
        Ok(Item::from_result(ConversionResult::failure(&error), ""))
    }
}
