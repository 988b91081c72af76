use serde::Serialize;

/// An exception reported on a span event.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionData {
    /// The exception chain, outermost first.
    pub exceptions: Vec<ExceptionDetails>,
}

/// A single exception in the chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception type name.
    pub type_name: String,
    /// Exception message, when one is present on the first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the full stack was captured.
    pub has_full_stack: bool,
    /// The raw stack trace text.
    pub stack: String,
    /// Frames recognized in the stack trace.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parsed_stack: Vec<StackFrame>,
}

/// A single recognized stack frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// Position in the stack, outermost frame first.
    pub level: i32,
    /// Fully qualified method or function name.
    pub method: String,
    /// Source file, when the frame names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Line number, when the frame names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<i64>,
}

/// Minimal parse of a stack-trace string into an exception record.
///
/// Only the first line is interpreted for type and message; `at …` lines
/// become frames. Anything unrecognized stays available through the raw
/// `stack` text, so a lossy parse never loses information.
pub fn minimal_parse(stacktrace: &str) -> Vec<ExceptionDetails> {
    let first_line = stacktrace.lines().next().unwrap_or("").trim();
    let (type_name, message) = match first_line.split_once(':') {
        Some((type_name, message)) => {
            let message = message.trim();
            (
                type_name.trim().to_string(),
                (!message.is_empty()).then(|| message.to_string()),
            )
        }
        None => (first_line.to_string(), None),
    };

    let parsed_stack = stacktrace
        .lines()
        .skip(1)
        .filter_map(|line| line.trim().strip_prefix("at "))
        .enumerate()
        .map(|(level, frame)| parse_frame(level as i32, frame))
        .collect();

    vec![ExceptionDetails {
        type_name,
        message,
        has_full_stack: true,
        stack: stacktrace.to_string(),
        parsed_stack,
    }]
}

fn parse_frame(level: i32, frame: &str) -> StackFrame {
    let (method, location) = match frame.split_once('(') {
        Some((method, rest)) => (method.trim(), rest.trim_end_matches(')')),
        None => (frame.trim(), ""),
    };
    let (file_name, line) = match location.rsplit_once(':') {
        Some((file, line)) => match line.parse::<i64>() {
            Ok(line) => (Some(file.to_string()), Some(line)),
            Err(_) => ((!location.is_empty()).then(|| location.to_string()), None),
        },
        None => ((!location.is_empty()).then(|| location.to_string()), None),
    };
    StackFrame {
        level,
        method: method.to_string(),
        file_name,
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACKTRACE: &str = "java.lang.IllegalStateException: connection reset\n\
        \tat com.example.Client.send(Client.java:123)\n\
        \tat com.example.Worker.run(Worker.java:45)\n\
        Caused by: java.io.IOException: broken pipe";

    #[test]
    fn parses_type_and_message_from_first_line() {
        let parsed = minimal_parse(STACKTRACE);
        assert_eq!(parsed.len(), 1);
        let details = &parsed[0];
        assert_eq!(details.type_name, "java.lang.IllegalStateException");
        assert_eq!(details.message.as_deref(), Some("connection reset"));
        assert!(details.has_full_stack);
        assert_eq!(details.stack, STACKTRACE);
    }

    #[test]
    fn parses_frames_with_file_and_line() {
        let parsed = minimal_parse(STACKTRACE);
        let frames = &parsed[0].parsed_stack;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].level, 0);
        assert_eq!(frames[0].method, "com.example.Client.send");
        assert_eq!(frames[0].file_name.as_deref(), Some("Client.java"));
        assert_eq!(frames[0].line, Some(123));
        assert_eq!(frames[1].method, "com.example.Worker.run");
    }

    #[test]
    fn tolerates_a_bare_type_line() {
        let parsed = minimal_parse("SomethingBroke");
        assert_eq!(parsed[0].type_name, "SomethingBroke");
        assert_eq!(parsed[0].message, None);
        assert!(parsed[0].parsed_stack.is_empty());
    }
}
