use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use s3gate_store::ByteStream;
use tokio_util::sync::WaitForCancellationFutureOwned;

use crate::{GatewayError, RequestContext};

/// Response body that relays an upstream object stream to the client.
///
/// The upstream body is released exactly once: when it is exhausted, when it
/// fails, when the request token is cancelled, or when the relay is dropped
/// before completion (client disconnect).
pub struct BodyRelay {
    body: Option<ByteStream>,
    ctx: RequestContext,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    bytes_sent: u64,
}

impl BodyRelay {
    pub fn new(body: ByteStream, ctx: RequestContext) -> Self {
        let cancelled = Box::pin(ctx.cancel.clone().cancelled_owned());
        Self {
            body: Some(body),
            ctx,
            cancelled,
            bytes_sent: 0,
        }
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    fn release(&mut self) -> bool {
        self.body.take().is_some()
    }
}

impl Stream for BodyRelay {
    type Item = Result<Bytes, io::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.body.is_none() {
            return Poll::Ready(None);
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.release();
            tracing::debug!(
                bucket = %this.ctx.bucket,
                key = %this.ctx.key,
                bytes_sent = this.bytes_sent,
                "relay stopped by cancellation"
            );
            return Poll::Ready(Some(Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "request cancelled",
            ))));
        }

        let polled = match this.body.as_mut() {
            Some(body) => body.as_mut().poll_next(cx),
            None => return Poll::Ready(None),
        };

        match polled {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes_sent += chunk.len() as u64;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(err))) => {
                this.release();
                let kind = err.kind();
                let err = GatewayError::StreamCopy { source: err };
                if this.ctx.cancel.is_cancelled() {
                    tracing::debug!(bucket = %this.ctx.bucket, key = %this.ctx.key, error = %err, "upstream read ended after cancellation");
                } else {
                    tracing::error!(
                        bucket = %this.ctx.bucket,
                        key = %this.ctx.key,
                        bytes_sent = this.bytes_sent,
                        error = %err,
                        "failed to copy object body"
                    );
                }
                Poll::Ready(Some(Err(io::Error::new(kind, err))))
            }
            Poll::Ready(None) => {
                this.release();
                tracing::debug!(
                    bucket = %this.ctx.bucket,
                    key = %this.ctx.key,
                    bytes_sent = this.bytes_sent,
                    "object streamed"
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for BodyRelay {
    fn drop(&mut self) {
        if self.release() {
            self.ctx.cancel.cancel();
            tracing::debug!(
                bucket = %self.ctx.bucket,
                key = %self.ctx.key,
                bytes_sent = self.bytes_sent,
                "client went away before the object was fully sent"
            );
        }
    }
}
