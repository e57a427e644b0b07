//! Progress-reporting multipart bodies.

use advoca_core::backend::ProgressSender;
use advoca_core::error::Result;
use advoca_core::upload::UploadSource;
use futures::TryStreamExt;
use reqwest::Body;
use reqwest::multipart::Part;
use tokio_util::io::ReaderStream;

/// Builds the multipart file part, reporting cumulative progress in `[0, 1]`
/// as chunks leave the reader.
///
/// An empty file reports nothing; completion alone drives its task to 1.0.
pub(crate) async fn file_part(source: &UploadSource, progress: ProgressSender) -> Result<Part> {
    let file = tokio::fs::File::open(&source.path).await?;
    let total = file.metadata().await?.len();

    let mut sent: u64 = 0;
    let stream = ReaderStream::new(file).inspect_ok(move |chunk| {
        sent += chunk.len() as u64;
        if total > 0 {
            let _ = progress.send(sent as f32 / total as f32);
        }
    });

    Ok(Part::stream_with_length(Body::wrap_stream(stream), total)
        .file_name(source.file_name.clone()))
}
