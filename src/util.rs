// Utility helpers shared across components.

use wasm_bindgen::JsValue;

pub fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub fn cwarn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// Scores are integers in most recordings; keep them short when they are.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_scores_drop_the_fraction() {
        assert_eq!(format_score(42.0), "42");
        assert_eq!(format_score(0.0), "0");
    }

    #[test]
    fn fractional_scores_keep_one_decimal() {
        assert_eq!(format_score(1.25), "1.2");
        assert_eq!(format_score(-0.5), "-0.5");
    }
}
