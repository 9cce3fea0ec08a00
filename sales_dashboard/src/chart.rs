//! Horizontal text bar chart

use std::fmt;

const BAR: char = '█';
const SI_PREFIXES: [&str; 9] = ["n", "µ", "m", "", "k", "M", "G", "T", "P"];

/// Two significant digits with an SI suffix: `12k`, `1.3M`, `260`, `5.0`
pub fn compact_label(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0.0".to_string();
    }

    let magnitude = value.abs();
    let mut exponent = magnitude.log10().floor() as i32;
    let unit = 10f64.powi(exponent - 1);
    let rounded = (magnitude / unit).round() * unit;
    // rounding can carry into the next power of ten (999 → 1000)
    if rounded >= 10f64.powi(exponent + 1) {
        exponent += 1;
    }

    let group = exponent.div_euclid(3).clamp(-3, 5);
    let scaled = rounded / 1000f64.powi(group);
    let decimals = (1 - (exponent - 3 * group)).max(0) as usize;
    let sign = if value < 0.0 { "-" } else { "" };

    format!(
        "{}{:.*}{}",
        sign,
        decimals,
        scaled,
        SI_PREFIXES[(group + 3) as usize]
    )
}

/// Labelled bars scaled so the largest value spans `width` characters
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    title: String,
    bars: Vec<(String, f64)>,
    width: usize,
}

impl BarChart {
    pub fn new(title: impl Into<String>, bars: Vec<(String, f64)>, width: usize) -> Self {
        Self {
            title: title.into(),
            bars,
            width,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bars(&self) -> &[(String, f64)] {
        &self.bars
    }

    /// Bar length for `value`; negative values draw nothing
    pub fn bar_len(&self, value: f64) -> usize {
        let max = self
            .bars
            .iter()
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);
        if max <= 0.0 || value <= 0.0 {
            return 0;
        }
        ((value / max) * self.width as f64).round() as usize
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if self.bars.is_empty() {
            return writeln!(f, "  (no rows)");
        }

        let label_width = self
            .bars
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, value) in &self.bars {
            let bar: String = std::iter::repeat(BAR).take(self.bar_len(*value)).collect();
            writeln!(
                f,
                "  {:<lw$} | {} {}",
                label,
                bar,
                compact_label(*value),
                lw = label_width
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0.0")]
    #[case(5.0, "5.0")]
    #[case(42.0, "42")]
    #[case(260.0, "260")]
    #[case(999.0, "1.0k")]
    #[case(12_345.0, "12k")]
    #[case(275_230.0, "280k")]
    #[case(1_300_000.0, "1.3M")]
    #[case(0.5, "500m")]
    #[case(-12_345.0, "-12k")]
    fn compact_labels(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(compact_label(value), expected);
    }

    #[test]
    fn scales_bars_to_width() {
        let chart = BarChart::new(
            "Totals",
            vec![("Beverages".to_string(), 50.0), ("Fastfood".to_string(), 100.0)],
            10,
        );
        assert_eq!(chart.bar_len(100.0), 10);
        assert_eq!(chart.bar_len(50.0), 5);
        assert_eq!(chart.bar_len(-3.0), 0);

        let rendered = chart.to_string();
        assert_eq!(
            rendered,
            "Totals\n  Beverages | █████ 50\n  Fastfood  | ██████████ 100\n"
        );
    }

    #[test]
    fn empty_chart_says_so() {
        let chart = BarChart::new("Totals", Vec::new(), 10);
        assert_eq!(chart.to_string(), "Totals\n  (no rows)\n");
    }
}
