use crate::error::PKResult;
use crate::simulation::{InteractionResult, InteractionSummary};
use log::info;
use std::fs::File;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn save_results<P: AsRef<Path>>(result: &InteractionResult, output_dir: P) -> PKResult<()> {
    let output_path = output_dir.as_ref();

    // Aligned time series for plotting
    save_series(result, output_path.join("series.csv"))?;

    // Scalar metrics
    save_summary(&result.summary(), output_path.join("summary.json"))?;

    info!("All results saved to {:?}", output_path);
    Ok(())
}

fn save_series<P: AsRef<Path>>(result: &InteractionResult, path: P) -> PKResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "HOUR",
        "TIMESTAMP",
        "PRIMARY",
        "SIDE_EFFECT",
        "COUNTER",
        "MITIGATION",
    ])?;

    for (i, hour) in result.grid.hours().iter().enumerate() {
        writer.write_record(&[
            format!("{:.4}", hour),
            result.grid.timestamp_at(i).format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", result.primary_curve[i]),
            format!("{:.4}", result.side_effect_curve[i]),
            format!("{:.4}", result.counter_curve[i]),
            format!("{:.4}", result.mitigation_curve[i]),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn save_summary<P: AsRef<Path>>(summary: &InteractionSummary, path: P) -> PKResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

/// Markdown digest of one run, written next to the data files.
pub fn generate_report<P: AsRef<Path>>(result: &InteractionResult, output_dir: P) -> PKResult<()> {
    let report_path = output_dir.as_ref().join("report.md");
    std::fs::write(report_path, render_report(result))?;
    Ok(())
}

fn render_report(result: &InteractionResult) -> String {
    let summary = result.summary();
    let rec = &summary.recommendation;

    let counter_line = match (&summary.counter_drug, rec.optimal_counter_time) {
        (Some(drug), Some(time)) => format!(
            "- **Suggested {} time**: {} (+{:.2} h after primary, t_max {:.2} h)",
            drug,
            time.format(TIMESTAMP_FORMAT),
            rec.optimal_offset_hours.unwrap_or(0.0),
            rec.counter_t_max_hours.unwrap_or(0.0),
        ),
        _ => "- **Suggested counter time**: no counter medication selected".to_string(),
    };

    format!(
        r#"# Side-Effect Overlap Report

## Inputs
- **Primary drug**: {}
- **Side-effect model**: {}
- **Counter drug**: {}
- **Window**: {:.1} h from {} ({} samples)

## Side-Effect Landmarks
- **Onset**: {} (+{:.2} h after primary dose)
- **Peak**: {} (+{:.2} h after primary dose)

## Recommendation ({:?})
{}
- **Coverage**: {:.1}% of side-effect burden overlapped

## Curve Areas (normalized units x h)
- Primary: {:.1}
- Side effect: {:.1}
- Counter: {:.1}
- Mitigation: {:.1}

## Notes
Curves come from a one-compartment absorption/elimination model and are
normalized for display. This is a timing aid, not dosing guidance.
"#,
        summary.primary_drug,
        summary.side_effect.category(),
        summary.counter_drug.as_deref().unwrap_or("none"),
        summary.window_hours,
        summary.grid_start.format(TIMESTAMP_FORMAT),
        summary.sample_count,
        rec.onset_time.format(TIMESTAMP_FORMAT),
        rec.onset_hours,
        rec.peak_time.format(TIMESTAMP_FORMAT),
        rec.peak_hours,
        rec.policy,
        counter_line,
        rec.coverage_percent,
        summary.primary.auc,
        summary.side_effect_curve.auc,
        summary.counter.auc,
        summary.mitigation.auc,
    )
}
