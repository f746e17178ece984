use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting pipeline...");

        // Extract
        tracing::info!("Extracting lines...");
        let raw_data = self.pipeline.extract().await?;

        // Transform
        tracing::info!("Transforming lines...");
        let transformed = self.pipeline.transform(raw_data).await?;

        // Load
        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(transformed).await?;

        tracing::info!(
            "Pipeline finished in {:?}, output saved to: {}",
            started.elapsed(),
            output_path
        );
        Ok(output_path)
    }
}
