//! Asynchronous CSV reader with batch interface
//!
//! Reads ledger commands in fixed-size batches using csv-async, so the
//! concurrent strategy can hand whole batches to the `BatchProcessor`.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerCommand, LedgerError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read up to `batch_size` commands
    ///
    /// Rows that fail to parse are logged and skipped; they do not count
    /// towards the batch size. An empty batch means end of input.
    ///
    /// # Errors
    ///
    /// Returns `IoError` when the underlying reader fails. The rows read
    /// before the failure are dropped along with the batch.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<LedgerCommand>, LedgerError> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(next) = records.next().await else {
                break;
            };
            self.line_num += 1;

            match next.map_err(LedgerError::from).and_then(convert_csv_record) {
                Ok(command) => batch.push(command),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(error = %e.at_line(self.line_num), "skipping malformed row"),
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::{AsyncReadExt, Cursor};
    use rust_decimal::Decimal;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Input whose every read fails
    struct FailingInput;

    impl AsyncRead for FailingInput {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut [u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::Other, "disk gone")))
        }
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "type,account,to,amount\ncreate,,,\nadjust,1,,100.0\ntransfer,1,2,5\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], LedgerCommand::Create);
        assert_eq!(
            batch[1],
            LedgerCommand::Adjust {
                account: 1,
                delta: Decimal::new(1000, 1)
            }
        );

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].primary_account(), Some(1));

        assert!(async_reader.read_batch(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let csv_content = "type,account,to,amount\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        assert!(async_reader.read_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_records() {
        let csv_content = "type,account,to,amount\n\
                           withdraw,1,,100.0\n\
                           adjust,1,,oops\n\
                           balance,1,,\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();
        assert_eq!(batch, vec![LedgerCommand::Balance { account: 1 }]);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let csv_content = "type,account,to,amount\n  TRANSFER  ,  1  ,  2  ,  0.50  \n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();
        assert_eq!(
            batch,
            vec![LedgerCommand::Transfer {
                from: 1,
                to: 2,
                amount: Decimal::new(50, 2)
            }]
        );
    }

    #[tokio::test]
    async fn test_async_reader_stops_on_read_failure() {
        let csv_content = "type,account,to,amount\ncreate,,,\nadjust,1,,5\n";
        let input = Cursor::new(csv_content.as_bytes()).chain(FailingInput);
        let mut async_reader = AsyncReader::new(input);

        let result = async_reader.read_batch(10).await;

        assert!(matches!(result, Err(LedgerError::IoError { .. })), "{:?}", result);
    }
}
