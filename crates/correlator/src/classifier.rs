use escalator_core::{config::CorrelatorConfig, OutcomeEvent, ResponseStatus};

/// 根据 IVR 按键判定应答状态
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    ivr_module_type: String,
    available_digit: String,
    unavailable_digit: String,
}

impl ResponseClassifier {
    pub fn new(config: &CorrelatorConfig) -> Self {
        Self {
            ivr_module_type: config.ivr_module_type.clone(),
            available_digit: config.available_digit.clone(),
            unavailable_digit: config.unavailable_digit.clone(),
        }
    }

    /// 目标关联ID的第一条按键事件中的输入
    pub fn find_input(&self, events: &[OutcomeEvent], correlation_id: &str) -> Option<String> {
        events
            .iter()
            .filter(|event| event.correlation_id() == Some(correlation_id))
            .find(|event| event.is_module(&self.ivr_module_type))
            .and_then(OutcomeEvent::input_digits)
    }

    pub fn classify(&self, input: Option<&str>) -> ResponseStatus {
        match input {
            Some(digit) if digit == self.available_digit => ResponseStatus::AnsweredAvailable,
            Some(digit) if digit == self.unavailable_digit => ResponseStatus::AnsweredUnavailable,
            _ => ResponseStatus::NoAnswer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> OutcomeEvent {
        serde_json::from_value(value).unwrap()
    }

    fn classifier() -> ResponseClassifier {
        ResponseClassifier::new(&CorrelatorConfig::default())
    }

    #[test]
    fn test_classify_digits() {
        let c = classifier();
        assert_eq!(c.classify(Some("1")), ResponseStatus::AnsweredAvailable);
        assert_eq!(c.classify(Some("2")), ResponseStatus::AnsweredUnavailable);
        assert_eq!(c.classify(Some("9")), ResponseStatus::NoAnswer);
        assert_eq!(c.classify(Some("")), ResponseStatus::NoAnswer);
        assert_eq!(c.classify(None), ResponseStatus::NoAnswer);
    }

    #[test]
    fn test_find_input_scoped_to_correlation_id() {
        let events = vec![
            event(json!({"ContactId": "other", "ContactFlowModuleType": "GetUserInput", "Results": "1"})),
            event(json!({"ContactId": "c-1", "ContactFlowModuleType": "PlayPrompt"})),
            event(json!({"ContactId": "c-1", "ContactFlowModuleType": "GetUserInput", "Results": 2})),
        ];
        assert_eq!(classifier().find_input(&events, "c-1").as_deref(), Some("2"));
        assert_eq!(classifier().find_input(&events, "c-2"), None);
    }
}
