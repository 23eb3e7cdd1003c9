//! Human-readable reports for analysis summaries

use crate::analysis::{LatencySummary, ReflectiveSummary};

const RULE_WIDTH: usize = 60;

fn banner(title: &str) -> String {
    format!(
        "\n{}\n{}\n{}\n",
        "=".repeat(RULE_WIDTH),
        title,
        "=".repeat(RULE_WIDTH)
    )
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

impl LatencySummary {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = banner("LATENCY ANALYSIS");

        let baseline = &self.baseline;
        report.push_str(&format!(
            "\nBaseline ({}): median={:.0}ms  n={}  CI=[{:.0}, {:.0}]\n",
            baseline.variant,
            baseline.median_ms,
            baseline.n,
            baseline.bootstrap_ci.ci_lower,
            baseline.bootstrap_ci.ci_upper
        ));

        report.push_str(&format!(
            "\nTotal runs: {}  Failed: {}  Failure rate: {}\n",
            self.total_runs,
            self.failed_runs,
            percent(self.failure_rate)
        ));

        report.push_str(&format!(
            "\n{:<12} {:>4} {:>10} {:>10} {:>10} {:>20}\n",
            "Variant", "N", "Median", "Overhead", "Class", "CI"
        ));
        report.push_str(&format!("{}\n", "-".repeat(68)));
        for (variant, data) in &self.variants {
            let ci = &data.bootstrap_ci_overhead;
            let ci_str = format!("[{:.0}, {:.0}]", ci.ci_lower, ci.ci_upper);
            report.push_str(&format!(
                "{:<12} {:>4} {:>9.0}ms {:>+9.0}ms {:>10} {:>20}\n",
                variant,
                data.n,
                data.median_ms,
                data.overhead_ms,
                data.classification.to_string(),
                ci_str
            ));
        }

        report.push_str(&format!("\nDecision class: {}\n", self.decision_class));
        report.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));
        report
    }
}

impl ReflectiveSummary {
    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = banner("REFLECTIVE ANALYSIS");
        let scores = &self.scores;
        let secondary = &self.secondary;
        let wilcoxon = &self.wilcoxon;
        let ci = &self.bootstrap_ci_delta;

        report.push_str(&format!(
            "\nMethods: {} (A) vs {} (B)\n",
            self.method_a, self.method_b
        ));
        report.push_str(&format!("Paired cycles: {}\n", self.n_paired));
        report.push_str(&format!(
            "Parse failures: {}/{} ({})\n",
            self.parse_failures,
            self.total_runs,
            percent(self.parse_rate)
        ));

        report.push_str(&format!(
            "\n{:<20} {:>10} {:>10} {:>10}\n",
            "Metric", "A", "B", "Delta"
        ));
        report.push_str(&format!("{}\n", "-".repeat(52)));
        report.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2} {:>+10.2}\n",
            "Mean score", scores.mean_a, scores.mean_b, scores.mean_delta
        ));
        report.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2}\n",
            "Stdev", scores.stdev_a, scores.stdev_b
        ));
        report.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2}\n",
            "Mean TP", secondary.mean_tp_a, secondary.mean_tp_b
        ));
        report.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2} {:>+10.2}\n",
            "Mean FP", secondary.mean_fp_a, secondary.mean_fp_b, secondary.delta_fp
        ));
        report.push_str(&format!(
            "{:<20} {:>10.2} {:>10.2} {:>+10.2}\n",
            "Mean recall",
            secondary.mean_recall_a,
            secondary.mean_recall_b,
            secondary.delta_recall
        ));

        report.push_str(&format!(
            "\nStdev ratio: {:.4} (threshold: <= 0.35)\n",
            scores.stdev_ratio
        ));

        report.push_str("\nWilcoxon signed-rank test:\n");
        report.push_str(&format!(
            "  T+ = {:.1}, T- = {:.1}, T = {:.1}\n",
            wilcoxon.t_plus, wilcoxon.t_minus, wilcoxon.t_stat
        ));
        report.push_str(&format!(
            "  n_nonzero = {}, method = {}\n",
            wilcoxon.n_nonzero, wilcoxon.method
        ));
        if wilcoxon.sufficient {
            report.push_str(&format!(
                "  z = {:.4}, p = {:.6}\n",
                wilcoxon.z_stat, wilcoxon.p_value
            ));
        } else {
            report.push_str("  Insufficient sample size for normal approximation\n");
        }

        report.push_str(&format!(
            "\nBootstrap {}% CI on mean delta_score:\n",
            ci.ci_level * 100.0
        ));
        report.push_str(&format!("  [{:.4}, {:.4}]\n", ci.ci_lower, ci.ci_upper));
        report.push_str(&format!("  Excludes zero: {}\n", ci.excludes_zero()));

        report.push_str(&format!("\nVerdict: {}\n", self.verdict));
        report.push_str(&format!("Decision class: {}\n", self.decision_class));

        if let Some(session) = &self.session_stability {
            report.push_str(&format!(
                "\nSession stability: {}\n",
                if session.stable { "STABLE" } else { "UNSTABLE" }
            ));
            report.push_str(&format!(
                "  Sessions: {}, Failed: {}, Retried: {}\n",
                session.total_sessions, session.failed_sessions, session.retried_sessions
            ));
        }

        report.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));
        report
    }
}
