use crate::domain::services::balancer::SplitStrategy;
use crate::domain::services::morph::StrokeDefaults;
use crate::domain::services::sequencer::InterpolationMode;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn default_stroke_width(&self) -> Option<f64>;
    fn split_strategy(&self) -> SplitStrategy;
    fn steps(&self) -> usize;
    fn interpolation_mode(&self) -> InterpolationMode;
    /// 有設定時輸出像素座標與線寬
    fn canvas_size(&self) -> Option<(f64, f64)>;
    fn stroke_defaults(&self) -> StrokeDefaults;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}
