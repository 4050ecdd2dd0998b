//! Subcommand handlers: parse arguments, run the engine, build output records.

use color_eyre::eyre::{Result, WrapErr, eyre};
use palette::Srgb;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::Command;
use crate::config::ToolConfig;
use crate::convert::{
    ColorConversions, ColorSpace, ColorValue, conversions, convert, hex_serde, parse_color, to_hex,
};
use crate::distance::{
    DistanceMethod, Match, NearDuplicate, distance, distinctiveness_score, near_duplicates,
    nearest,
};
use crate::vision::{
    Deficiency, DeficiencyCheck, SimulatedColorSet, SimulatedContrast, colorblind_friendly,
    simulate, simulate_all, simulated_contrasts,
};
use crate::wcag::{
    AccessibilityReport, ContrastResult, PairResult, TextSize, WcagLevel, best_text_combinations,
    evaluate_pair, evaluate_palette, minimum_contrast_ratio, readable_text_color,
};

/// Rendered-ready result of a subcommand.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Conversions(Box<ColorConversions>),
    Selected(Vec<ColorValue>),
    Contrast(ContrastOutput),
    Palette(PaletteOutput),
    Distance(DistanceOutput),
    Nearest(Match),
    Simulated(Vec<SimulatedColorSet>),
    SimulatedOne(Vec<SingleSimulation>),
    Distinct(DistinctOutput),
}

/// Outcome of a subcommand: what to print and whether it counts as a pass.
#[derive(Debug)]
pub struct Outcome {
    pub output: Output,
    pub passed: bool,
}

impl Outcome {
    fn pass(output: Output) -> Self {
        Self {
            output,
            passed: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContrastOutput {
    #[serde(serialize_with = "hex_serde::serialize")]
    pub foreground: Srgb<u8>,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub background: Srgb<u8>,
    pub level: WcagLevel,
    pub size: TextSize,
    pub required: f64,
    pub passes: bool,
    #[serde(flatten)]
    pub result: ContrastResult,
    /// Black or white, whichever reads better on the background
    #[serde(serialize_with = "hex_serde::serialize")]
    pub suggested_text: Srgb<u8>,
    /// The pair as seen with each color vision deficiency
    pub color_vision: Vec<SimulatedContrast>,
}

#[derive(Debug, Serialize)]
pub struct PaletteOutput {
    #[serde(flatten)]
    pub report: AccessibilityReport,
    pub best_text_combinations: Vec<PairResult>,
}

#[derive(Debug, Serialize)]
pub struct DistanceOutput {
    pub method: DistanceMethod,
    pub distance: f64,
}

#[derive(Debug, Serialize)]
pub struct SingleSimulation {
    #[serde(serialize_with = "hex_serde::serialize")]
    pub original: Srgb<u8>,
    pub deficiency: Deficiency,
    #[serde(serialize_with = "hex_serde::serialize")]
    pub simulated: Srgb<u8>,
}

#[derive(Debug, Serialize)]
pub struct DistinctOutput {
    pub threshold: f64,
    pub distinct: bool,
    pub distinctiveness: f64,
    pub near_duplicates: Vec<NearDuplicate>,
    pub color_vision: Vec<DeficiencyCheck>,
}

fn parse_arg(input: &str) -> Result<Srgb<u8>> {
    parse_color(input).map_err(|e| eyre!("Invalid color '{}': {}", input, e))
}

fn parse_args(inputs: &[String]) -> Result<Vec<Srgb<u8>>> {
    inputs.iter().map(|s| parse_arg(s)).collect()
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(eyre!(
            "Invalid threshold {}: must be a finite, non-negative Lab distance",
            threshold
        ))
    }
}

/// Run a subcommand against the effective configuration.
pub fn run(command: &Command, config: &ToolConfig) -> Result<Outcome> {
    let analysis = &config.analysis;

    match command {
        Command::Convert { color, to } => {
            let color = parse_arg(color)?;
            let spaces: Vec<ColorSpace> = if to.is_empty() {
                analysis.color_spaces().wrap_err("Invalid color spaces in config")?
            } else {
                to.iter().map(|s| (*s).into()).collect()
            };
            debug!(color = %to_hex(color), spaces = spaces.len(), "convert");

            if to.is_empty() && spaces.len() == ColorSpace::ALL.len() {
                Ok(Outcome::pass(Output::Conversions(Box::new(
                    conversions(color),
                ))))
            } else {
                let values = spaces.into_iter().map(|s| convert(color, s)).collect();
                Ok(Outcome::pass(Output::Selected(values)))
            }
        }

        Command::Contrast {
            foreground,
            background,
            level,
            size,
        } => {
            let fg = parse_arg(foreground)?;
            let bg = parse_arg(background)?;
            let level = level.map(Into::into).unwrap_or(analysis.level);
            let size = size.map(Into::into).unwrap_or(analysis.text_size);

            let result = evaluate_pair(fg, bg);
            let passes = result.passes(level, size);
            if !passes {
                warn!(
                    fg = %to_hex(fg),
                    bg = %to_hex(bg),
                    ratio = result.ratio,
                    %level,
                    %size,
                    "Pair fails WCAG contrast"
                );
            }

            Ok(Outcome {
                output: Output::Contrast(ContrastOutput {
                    foreground: fg,
                    background: bg,
                    level,
                    size,
                    required: minimum_contrast_ratio(level, size),
                    passes,
                    result,
                    suggested_text: readable_text_color(bg),
                    color_vision: simulated_contrasts(fg, bg, &Deficiency::ALL),
                }),
                passed: passes,
            })
        }

        Command::Palette { colors, top } => {
            let colors = parse_args(colors)?;
            let top = top.unwrap_or(analysis.top_combinations);
            let report = evaluate_palette(&colors);
            let best = best_text_combinations(&colors, top);
            info!(
                colors = colors.len(),
                pairs = report.pairs.len(),
                score = report.score,
                "Palette evaluated"
            );
            Ok(Outcome::pass(Output::Palette(PaletteOutput {
                report,
                best_text_combinations: best,
            })))
        }

        Command::Distance {
            first,
            second,
            method,
        } => {
            let a = parse_arg(first)?;
            let b = parse_arg(second)?;
            let method = method.map(Into::into).unwrap_or(analysis.distance_method);
            Ok(Outcome::pass(Output::Distance(DistanceOutput {
                method,
                distance: distance(a, b, method),
            })))
        }

        Command::Nearest {
            color,
            candidates,
            method,
        } => {
            let color = parse_arg(color)?;
            let candidates = parse_args(candidates)?;
            let method = method.map(Into::into).unwrap_or(analysis.distance_method);
            let hit = nearest(color, &candidates, method).wrap_err("Nearest match failed")?;
            Ok(Outcome::pass(Output::Nearest(hit)))
        }

        Command::Simulate { colors, deficiency } => {
            let colors = parse_args(colors)?;
            match deficiency {
                Some(d) => {
                    let deficiency: Deficiency = (*d).into();
                    let sims = colors
                        .iter()
                        .map(|&c| SingleSimulation {
                            original: c,
                            deficiency,
                            simulated: simulate(c, deficiency),
                        })
                        .collect();
                    Ok(Outcome::pass(Output::SimulatedOne(sims)))
                }
                None => Ok(Outcome::pass(Output::Simulated(
                    colors.iter().map(|&c| simulate_all(c)).collect(),
                ))),
            }
        }

        Command::Distinct { colors, threshold } => {
            let colors = parse_args(colors)?;
            let threshold = threshold.unwrap_or(analysis.distinct_threshold);
            validate_threshold(threshold)?;
            let duplicates = near_duplicates(&colors, DistanceMethod::LabEuclidean, threshold);
            let color_vision = colorblind_friendly(&colors, &Deficiency::DICHROMACIES, threshold);
            let distinct = duplicates.is_empty();
            let passed = distinct && color_vision.iter().all(|c| c.distinguishable);

            Ok(Outcome {
                output: Output::Distinct(DistinctOutput {
                    threshold,
                    distinct,
                    distinctiveness: distinctiveness_score(&colors),
                    near_duplicates: duplicates,
                    color_vision,
                }),
                passed,
            })
        }
    }
}
