use crate::cli::Cli;
use crate::config::types::{
    GridConfig, MAX_FONT_SIZE, MAX_GRID_DIMENSION, SAMPLE_INTERVAL_SECONDS,
};
use crate::error::GridError;
use crate::tools::{validate_input_file, validate_output_extension};

impl TryFrom<Cli> for GridConfig {
    type Error = GridError;

    /// 在開啟任何資源之前驗證所有參數
    fn try_from(cli: Cli) -> Result<Self, GridError> {
        validate_input_file(&cli.input)?;
        let font_size = positive("字型大小", cli.size)?;
        if font_size > MAX_FONT_SIZE {
            return Err(GridError::InputValidation(format!(
                "字型大小不可超過 {MAX_FONT_SIZE}，收到 {font_size}"
            )));
        }
        let grid_columns = positive("網格欄數", cli.width)?;
        let shrink_divisor = positive("縮小倍率", cli.shrink)?;
        validate_output_extension(&cli.output)?;

        Ok(Self {
            input_path: cli.input,
            output_path: cli.output,
            font_size,
            grid_columns,
            interval_seconds: SAMPLE_INTERVAL_SECONDS,
            max_dimension: MAX_GRID_DIMENSION,
            shrink_divisor,
            font_path: cli.font,
        })
    }
}

fn positive(name: &str, value: i64) -> Result<u32, GridError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| GridError::InputValidation(format!("{name}必須是正整數，收到 {value}")))
}
