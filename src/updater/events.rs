use serde::{Deserialize, Serialize};

use super::error::UpdaterError;

/// 下载生命周期事件
///
/// 每次安装的顺序固定: 最多一个 `Started` 且必须在最前，随后任意个 `Progress`，
/// 最后恰好一个 `Finished`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum DownloadEvent {
    #[serde(rename_all = "camelCase")]
    Started { content_length: Option<u64> },
    #[serde(rename_all = "camelCase")]
    Progress { chunk_length: u64 },
    Finished,
}

impl DownloadEvent {
    /// 按 JSON 线上格式解析事件，未知标签返回错误而不是被忽略
    #[cfg(test)]
    pub(crate) fn from_json(value: &serde_json::Value) -> Result<Self, UpdaterError> {
        const KNOWN_EVENTS: [&str; 3] = ["Started", "Progress", "Finished"];

        let tag = value
            .get("event")
            .and_then(|tag| tag.as_str())
            .ok_or_else(|| UpdaterError::MalformedEvent(format!("missing event tag in {}", value)))?;

        if !KNOWN_EVENTS.contains(&tag) {
            return Err(UpdaterError::UnknownEvent(tag.to_string()));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| UpdaterError::MalformedEvent(format!("{}: {}", tag, e)))
    }

    pub fn name(&self) -> &'static str {
        match self {
            DownloadEvent::Started { .. } => "Started",
            DownloadEvent::Progress { .. } => "Progress",
            DownloadEvent::Finished => "Finished",
        }
    }
}

/// 下载进度跟踪
/// 累计已下载字节数并校验事件顺序，记录第一个顺序错误
#[derive(Debug, Default)]
pub struct DownloadTracker {
    content_length: Option<u64>,
    downloaded: u64,
    events_seen: usize,
    finished: bool,
    fault: Option<UpdaterError>,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &DownloadEvent) -> Result<(), UpdaterError> {
        let result = self.apply(event);
        if let Err(e) = &result {
            if self.fault.is_none() {
                self.fault = Some(e.clone());
            }
        }
        result
    }

    fn apply(&mut self, event: &DownloadEvent) -> Result<(), UpdaterError> {
        if self.finished {
            return Err(UpdaterError::EventOrder(format!(
                "{} received after Finished",
                event.name()
            )));
        }

        match event {
            DownloadEvent::Started { content_length } => {
                if self.events_seen > 0 {
                    return Err(UpdaterError::EventOrder(
                        "Started must be the first event".to_string(),
                    ));
                }
                self.content_length = *content_length;
            }
            DownloadEvent::Progress { chunk_length } => {
                self.downloaded = self.downloaded.saturating_add(*chunk_length);
            }
            DownloadEvent::Finished => {
                self.finished = true;
            }
        }

        self.events_seen += 1;
        Ok(())
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// 服务器未返回总大小时为 None
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 安装调用返回后确认事件流完整，返回累计下载字节数
    pub fn complete(&self) -> Result<u64, UpdaterError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if !self.is_finished() {
            return Err(UpdaterError::Install(
                "download ended without a Finished event".to_string(),
            ));
        }
        Ok(self.downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(tracker: &mut DownloadTracker, events: &[DownloadEvent]) {
        for event in events {
            tracker.record(event).unwrap();
        }
    }

    #[test]
    fn accumulates_progress_chunks() {
        let mut tracker = DownloadTracker::new();
        feed(
            &mut tracker,
            &[
                DownloadEvent::Started {
                    content_length: Some(1000),
                },
                DownloadEvent::Progress { chunk_length: 400 },
                DownloadEvent::Progress { chunk_length: 600 },
                DownloadEvent::Finished,
            ],
        );

        assert_eq!(tracker.content_length(), Some(1000));
        assert_eq!(tracker.downloaded(), 1000);
        assert!(tracker.is_finished());
        assert_eq!(tracker.complete(), Ok(1000));
    }

    #[test]
    fn started_is_optional_and_length_may_be_unknown() {
        let mut tracker = DownloadTracker::new();
        feed(
            &mut tracker,
            &[
                DownloadEvent::Progress { chunk_length: 10 },
                DownloadEvent::Finished,
            ],
        );
        assert_eq!(tracker.content_length(), None);
        assert_eq!(tracker.complete(), Ok(10));
    }

    #[test]
    fn rejects_second_started() {
        let mut tracker = DownloadTracker::new();
        tracker
            .record(&DownloadEvent::Started {
                content_length: None,
            })
            .unwrap();
        let err = tracker
            .record(&DownloadEvent::Started {
                content_length: Some(5),
            })
            .unwrap_err();
        assert!(matches!(err, UpdaterError::EventOrder(_)));
        assert_eq!(tracker.content_length(), None);
    }

    #[test]
    fn rejects_events_after_finished() {
        let mut tracker = DownloadTracker::new();
        feed(&mut tracker, &[DownloadEvent::Finished]);
        assert!(tracker
            .record(&DownloadEvent::Progress { chunk_length: 1 })
            .is_err());
        assert_eq!(tracker.downloaded(), 0);
    }

    #[test]
    fn first_fault_is_reported_on_complete() {
        let mut tracker = DownloadTracker::new();
        feed(&mut tracker, &[DownloadEvent::Progress { chunk_length: 1 }]);
        let _ = tracker.record(&DownloadEvent::Started {
            content_length: None,
        });
        let _ = tracker.record(&DownloadEvent::Finished);
        let _ = tracker.record(&DownloadEvent::Finished);

        let err = tracker.complete().unwrap_err();
        assert_eq!(
            err,
            UpdaterError::EventOrder("Started must be the first event".to_string())
        );
    }

    #[test]
    fn complete_requires_finished() {
        let mut tracker = DownloadTracker::new();
        feed(&mut tracker, &[DownloadEvent::Progress { chunk_length: 3 }]);
        assert!(matches!(tracker.complete(), Err(UpdaterError::Install(_))));
    }

    #[test]
    fn decodes_wire_events() {
        assert_eq!(
            DownloadEvent::from_json(&json!({"event": "Started", "data": {"contentLength": 1000}}))
                .unwrap(),
            DownloadEvent::Started {
                content_length: Some(1000)
            }
        );
        assert_eq!(
            DownloadEvent::from_json(&json!({"event": "Progress", "data": {"chunkLength": 64}}))
                .unwrap(),
            DownloadEvent::Progress { chunk_length: 64 }
        );
        assert_eq!(
            DownloadEvent::from_json(&json!({"event": "Finished"})).unwrap(),
            DownloadEvent::Finished
        );
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = DownloadEvent::from_json(&json!({"event": "Paused", "data": {}})).unwrap_err();
        assert_eq!(err, UpdaterError::UnknownEvent("Paused".to_string()));
    }

    #[test]
    fn missing_tag_or_payload_is_malformed() {
        assert!(matches!(
            DownloadEvent::from_json(&json!({"data": {}})),
            Err(UpdaterError::MalformedEvent(_))
        ));
        assert!(matches!(
            DownloadEvent::from_json(&json!({"event": "Progress", "data": {}})),
            Err(UpdaterError::MalformedEvent(_))
        ));
    }

    #[test]
    fn serializes_with_event_tag() {
        let value = serde_json::to_value(DownloadEvent::Progress { chunk_length: 7 }).unwrap();
        assert_eq!(value, json!({"event": "Progress", "data": {"chunkLength": 7}}));
    }
}
