//! The final outcome of a single workflow run.

use w3rt_core::{RunId, Value};

#[derive(Debug, Clone)]
pub struct RunResult {
    pub ok: bool,
    pub run_id: RunId,
    pub context: Value,
    pub error: Option<String>,
}

impl RunResult {
    #[must_use]
    pub fn context_path(&self, path: &str) -> Option<&Value> {
        self.context.get_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_path_reads_through() {
        let mut ctx = Value::map();
        ctx.set_path("quote.price", Value::Int(100));
        let result = RunResult { ok: true, run_id: RunId::from_string("r1"), context: ctx, error: None };
        assert_eq!(result.context_path("quote.price"), Some(&Value::Int(100)));
    }
}
