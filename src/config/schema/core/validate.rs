use super::Config;
use crate::config::schema::AgentConfig;
use crate::error::ConfigError;

impl Config {
    /// Rejects settings no game could run with. Payoff keys are already
    /// checked when the table is deserialized.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.n_steps == 0 {
            return Err(ConfigError::Validation(
                "table.n_steps must be a positive integer".into(),
            ));
        }
        if self.table.payoffs.entries().is_empty() {
            return Err(ConfigError::Validation("table.payoffs is empty".into()));
        }
        if self.naming.move1 == self.naming.move2 {
            return Err(ConfigError::Validation(
                "naming.move1 and naming.move2 must differ".into(),
            ));
        }
        for mv in [self.naming.move1, self.naming.move2] {
            if !self.table.payoffs.alphabet().contains(&mv) {
                tracing::warn!(
                    r#move = %mv,
                    alphabet = ?self.table.payoffs.alphabet(),
                    "naming move is not a payoff table move"
                );
            }
        }

        check_total_sum("division.total_sum", self.division.total_sum)?;
        for total in &self.division_sweep.total_sums {
            check_total_sum("division_sweep.total_sums", *total)?;
        }
        for ratio in &self.division_sweep.split_ratios {
            check_ratio("division_sweep.split_ratios", *ratio)?;
        }

        check_temperature("provider.temperature", self.provider.temperature)?;
        for (seat, agent) in [("agent1", &self.agent1), ("agent2", &self.agent2)] {
            match agent {
                AgentConfig::RatioDivision(cfg) => check_ratio(seat, cfg.ratio)?,
                AgentConfig::Llm(cfg) => {
                    if let Some(temp) = cfg.temperature {
                        check_temperature(seat, temp)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn check_total_sum(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be positive, got {value}"
        )))
    }
}

fn check_ratio(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field}: ratio must be within 0..=1, got {value}"
        )))
    }
}

fn check_temperature(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=2.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field}: temperature must be within 0..=2, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RatioDivisionConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_rounds_rejected() {
        let mut config = Config::default();
        config.table.n_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_total_rejected() {
        let mut config = Config::default();
        config.division.total_sum = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.division_sweep.total_sums = vec![1000.0, -5.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn ratio_out_of_range_rejected() {
        let mut config = Config::default();
        config.agent1 = AgentConfig::RatioDivision(RatioDivisionConfig { ratio: 1.5 });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("agent1"));

        let mut config = Config::default();
        config.division_sweep.split_ratios = vec![-0.1];
        assert!(config.validate().is_err());
    }
}
