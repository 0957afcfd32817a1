use crate::domain::model::SequenceResult;
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

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// `Some(filename)` 時所有輸出寫入同一個 ZIP
    fn bundle_filename(&self) -> Option<String>;
    /// 指定格式的輸出檔名 (tsv / csv / json / map)
    fn output_filename(&self, format: &str) -> String;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, content: String) -> Result<SequenceResult>;
    async fn load(&self, result: SequenceResult) -> Result<String>;
}
