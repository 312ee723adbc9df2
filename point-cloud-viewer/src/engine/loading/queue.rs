use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;

use super::content::ResidentPointCloud;
use super::sources::{LoadFuture, ModelNode, OctreeHandle};
use crate::error::LoadError;

/// Sending half of a [`PendingPointCloud`].
pub struct LoadResponder {
    sender: oneshot::Sender<Result<ResidentPointCloud, LoadError>>,
}

impl LoadResponder {
    /// Hand the outcome to whoever awaits it. Gives the outcome back if
    /// nobody is listening any more.
    pub fn send(
        self,
        outcome: Result<ResidentPointCloud, LoadError>,
    ) -> Result<(), Result<ResidentPointCloud, LoadError>> {
        self.sender.send(outcome)
    }

    pub fn is_listening(&self) -> bool {
        !self.sender.is_canceled()
    }
}

/// Eventual result of `Viewer::load`.
///
/// Resolves once the viewer has polled the load to completion and placed the
/// cloud in the scene. Resolves with [`LoadError::Cancelled`] if the viewer
/// is destroyed or dropped first.
#[must_use = "dropping the pending load only discards its result; errors are then logged"]
pub struct PendingPointCloud {
    receiver: oneshot::Receiver<Result<ResidentPointCloud, LoadError>>,
}

impl Future for PendingPointCloud {
    type Output = Result<ResidentPointCloud, LoadError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(LoadError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}

struct InFlightPointCloud {
    content_id: String,
    future: LoadFuture<OctreeHandle>,
    responder: LoadResponder,
}

struct InFlightModel {
    url: String,
    future: LoadFuture<ModelNode>,
}

/// A point cloud load that finished during the last poll.
pub struct CompletedPointCloud {
    pub content_id: String,
    pub result: Result<OctreeHandle, LoadError>,
    pub responder: LoadResponder,
}

pub struct CompletedModel {
    pub url: String,
    pub result: Result<ModelNode, LoadError>,
}

/// Loads started by the viewer and not yet applied to the scene.
#[derive(Default)]
pub struct LoadQueue {
    point_clouds: Vec<InFlightPointCloud>,
    models: Vec<InFlightModel>,
}

impl LoadQueue {
    pub fn push_point_cloud(
        &mut self,
        content_id: &str,
        future: LoadFuture<OctreeHandle>,
    ) -> PendingPointCloud {
        let (sender, receiver) = oneshot::channel();
        self.point_clouds.push(InFlightPointCloud {
            content_id: content_id.to_string(),
            future,
            responder: LoadResponder { sender },
        });
        PendingPointCloud { receiver }
    }

    pub fn push_model(&mut self, url: &str, future: LoadFuture<ModelNode>) {
        self.models.push(InFlightModel {
            url: url.to_string(),
            future,
        });
    }

    /// Poll every point cloud load once, in the order they were started.
    pub fn take_ready_point_clouds(&mut self) -> Vec<CompletedPointCloud> {
        let mut ready = Vec::new();
        let mut index = 0;
        while index < self.point_clouds.len() {
            match self.point_clouds[index].future.as_mut().now_or_never() {
                Some(result) => {
                    let done = self.point_clouds.remove(index);
                    ready.push(CompletedPointCloud {
                        content_id: done.content_id,
                        result,
                        responder: done.responder,
                    });
                }
                None => index += 1,
            }
        }
        ready
    }

    /// Poll every model load once, in the order they were started.
    pub fn take_ready_models(&mut self) -> Vec<CompletedModel> {
        let mut ready = Vec::new();
        let mut index = 0;
        while index < self.models.len() {
            match self.models[index].future.as_mut().now_or_never() {
                Some(result) => {
                    let done = self.models.remove(index);
                    ready.push(CompletedModel {
                        url: done.url,
                        result,
                    });
                }
                None => index += 1,
            }
        }
        ready
    }

    /// Drop every in-flight load. Awaiting callers observe
    /// [`LoadError::Cancelled`]. Returns how many loads were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.point_clouds.len() + self.models.len();
        self.point_clouds.clear();
        self.models.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.point_clouds.len() + self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;

    fn resident(id: u64) -> ResidentPointCloud {
        ResidentPointCloud {
            entity: Entity::PLACEHOLDER,
            octree: OctreeHandle(id),
        }
    }

    #[test]
    fn ready_loads_are_taken_in_start_order() {
        let mut queue = LoadQueue::default();
        let _a = queue.push_point_cloud("a", Box::pin(async { Ok(OctreeHandle(1)) }));
        let _b = queue.push_point_cloud("b", Box::pin(futures::future::pending()));
        let _c = queue.push_point_cloud("c", Box::pin(async { Err(LoadError::NotFound("c".into())) }));

        let ready = queue.take_ready_point_clouds();
        let ids: Vec<_> = ready.iter().map(|r| r.content_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn reply_resolves_the_pending_load() {
        let mut queue = LoadQueue::default();
        let pending = queue.push_point_cloud("a", Box::pin(async { Ok(OctreeHandle(7)) }));

        let done = queue.take_ready_point_clouds().pop().unwrap();
        assert!(done.responder.is_listening());
        assert!(done.responder.send(Ok(resident(7))).is_ok());

        let result = pending.now_or_never().unwrap().unwrap();
        assert_eq!(result.octree, OctreeHandle(7));
    }

    #[test]
    fn reply_reports_a_dropped_listener() {
        let mut queue = LoadQueue::default();
        drop(queue.push_point_cloud("a", Box::pin(async { Ok(OctreeHandle(1)) })));

        let done = queue.take_ready_point_clouds().pop().unwrap();
        assert!(!done.responder.is_listening());
        assert!(done.responder.send(Ok(resident(1))).is_err());
    }

    #[test]
    fn cancelling_rejects_waiting_callers() {
        let mut queue = LoadQueue::default();
        let pending = queue.push_point_cloud("a", Box::pin(futures::future::pending()));
        queue.push_model("m", Box::pin(futures::future::pending()));

        assert_eq!(queue.cancel_all(), 2);
        assert!(queue.is_empty());
        assert!(matches!(
            pending.now_or_never(),
            Some(Err(LoadError::Cancelled))
        ));
    }
}
