use crate::config::SUPPORTED_OUTPUT_EXTENSIONS;
use crate::error::GridError;
use std::path::Path;

pub fn validate_input_file(path: &Path) -> Result<(), GridError> {
    if !path.exists() {
        return Err(GridError::InputValidation(format!(
            "找不到輸入影片: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(GridError::InputValidation(format!(
            "輸入路徑不是檔案: {}",
            path.display()
        )));
    }
    Ok(())
}

pub fn validate_output_extension(path: &Path) -> Result<(), GridError> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_OUTPUT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });

    if !supported {
        return Err(GridError::InputValidation(format!(
            "輸出檔必須是 .jpg、.jpeg 或 .png: {}",
            path.display()
        )));
    }
    Ok(())
}
