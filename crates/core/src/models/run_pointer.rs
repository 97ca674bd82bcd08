use serde::{Deserialize, Serialize};

/// 发信运行与其后续关联运行之间的交接记录
///
/// 最新指针在每次发信时被覆盖（后写者胜）；同一值也按关联ID另存一份，
/// 关联器优先按关联ID查找，避免读取到其他周期的指针。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunPointer {
    pub log_key: String,
    #[serde(default)]
    pub contact_index: usize,
}

impl RunPointer {
    pub fn new(log_key: impl Into<String>, contact_index: usize) -> Self {
        Self {
            log_key: log_key.into(),
            contact_index,
        }
    }
    pub fn next_index(&self) -> usize {
        self.contact_index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_wire_format() {
        let pointer = RunPointer::new("connect-call-log/result_log_20261018_090000.json", 2);
        let json = serde_json::to_value(&pointer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "log_key": "connect-call-log/result_log_20261018_090000.json",
                "contact_index": 2
            })
        );
        assert_eq!(pointer.next_index(), 3);
    }

    #[test]
    fn test_missing_index_defaults_to_zero() {
        let pointer: RunPointer =
            serde_json::from_str(r#"{"log_key": "connect-call-log/a.json"}"#).unwrap();
        assert_eq!(pointer.contact_index, 0);
    }
}
