pub mod etl;
pub mod extract_pipeline;
pub mod morph_pipeline;

pub use crate::domain::model::{LineSet, Morph};
pub use crate::domain::ports::{ConfigProvider, OutputFormat, Pipeline, Storage};
pub use crate::utils::error::Result;

/// 輸出目錄與檔名組合成儲存路徑
pub(crate) fn output_location(output_path: &str, file_name: &str) -> String {
    let base = output_path.trim_end_matches('/');
    if base.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", base, file_name)
    }
}
