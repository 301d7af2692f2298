//! Chart rendering with Plotters for the four analyses

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::analysis::cohort::CohortMatrix;
use crate::analysis::delinquency::DelinquencyRow;
use crate::analysis::retention::{GroupDuration, RetentionTables};
use crate::analysis::revenue::RevenueExpansion;

const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const EXPANSION_COLOR: RGBColor = GREEN;
const CONTRACTION_COLOR: RGBColor = RED;

/// Render one ranked duration table as a bar chart
///
/// # Arguments
/// * `rows` - Ranked (group, mean duration) table, already sorted
/// * `title` - Chart caption
/// * `group_desc` - X axis description
/// * `output_path` - Path to save the PNG plot
pub fn render_duration_ranking(
    rows: &[GroupDuration],
    title: &str,
    group_desc: &str,
    output_path: &Path,
) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    if rows.is_empty() {
        root.present()?;
        return Ok(());
    }

    let max_duration = rows
        .iter()
        .map(|r| r.avg_duration)
        .fold(f64::NEG_INFINITY, f64::max);
    let n = rows.len();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(100)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max_duration * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(group_desc)
        .y_desc("Average Subscription Duration (months)")
        .x_labels(n)
        .x_label_formatter(&|x| {
            let idx = x.round() as isize;
            if (x - idx as f64).abs() < 0.25 && idx >= 0 && (idx as usize) < rows.len() {
                rows[idx as usize].group.clone()
            } else {
                String::new()
            }
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, row) in rows.iter().enumerate() {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, row.avg_duration)],
            BAR_COLOR.filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Scatter of lifetime average monthly revenue against current MRR,
/// colored by the expansion flag, with the y = x reference line.
pub fn render_revenue_scatter(result: &RevenueExpansion, output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    if result.rows.is_empty() {
        root.present()?;
        return Ok(());
    }

    let max_axis = result
        .rows
        .iter()
        .flat_map(|r| [r.average_monthly_revenue, r.current_mrr])
        .fold(f64::NEG_INFINITY, f64::max)
        * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Monthly Revenue vs Current MRR", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_axis, 0f64..max_axis)?;

    chart
        .configure_mesh()
        .x_desc("Average Monthly Revenue")
        .y_desc("Current MRR")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // Points above the diagonal are billing more now than their lifetime
    // average, the expansion signal.
    chart
        .draw_series(LineSeries::new(
            [(0.0, 0.0), (max_axis, max_axis)],
            BLUE.stroke_width(2),
        ))?
        .label("Current MRR = Average")
        .legend(|(x, y)| PathElement::new([(x, y), (x + 15, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(
            result
                .rows
                .iter()
                .filter(|r| r.expanding)
                .map(|r| Circle::new((r.average_monthly_revenue, r.current_mrr), 4, EXPANSION_COLOR.filled())),
        )?
        .label("Expanding")
        .legend(|(x, y)| Circle::new((x + 7, y), 4, EXPANSION_COLOR.filled()));

    chart
        .draw_series(
            result
                .rows
                .iter()
                .filter(|r| !r.expanding)
                .map(|r| Circle::new((r.average_monthly_revenue, r.current_mrr), 4, CONTRACTION_COLOR.filled())),
        )?
        .label("Not Expanding")
        .legend(|(x, y)| Circle::new((x + 7, y), 4, CONTRACTION_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Heatmap of the normalized cohort retention matrix. Cell intensity is
/// the retention rate, 0.0-1.0.
pub fn render_cohort_heatmap(matrix: &CohortMatrix, output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    if matrix.is_empty() {
        root.present()?;
        return Ok(());
    }

    let rows = matrix.cohorts.len();
    let cols = matrix.active.len();

    let mut chart = ChartBuilder::on(&root)
        .caption("Cohort Analysis - Customer Retention", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..cols as f64, 0f64..rows as f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Active Month")
        .y_desc("Cohort Month")
        .x_labels(cols.min(12))
        .y_labels(rows.min(12))
        .x_label_formatter(&|x| {
            let idx = x.floor() as usize;
            if x.fract() < 0.01 && idx < matrix.active.len() {
                matrix.active[idx].to_string()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y| {
            let idx = y.floor() as usize;
            if y.fract() < 0.01 && idx < matrix.cohorts.len() {
                matrix.cohorts[idx].to_string()
            } else {
                String::new()
            }
        })
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for row in 0..rows {
        for col in 0..cols {
            let rate = matrix.retention[[row, col]].clamp(0.0, 1.0);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(col as f64, row as f64), (col as f64 + 1.0, row as f64 + 1.0)],
                BLUE.mix(rate).filled(),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Triptych of bar charts: mean duration, mean total charges, and mean
/// current MRR, each split by the delinquency flag.
pub fn render_delinquency_panels(rows: &[DelinquencyRow], output_path: &Path) -> crate::Result<()> {
    let root = BitMapBackend::new(output_path, (800, 1500)).into_drawing_area();
    root.fill(&WHITE)?;
    if rows.is_empty() {
        root.present()?;
        return Ok(());
    }

    let panels = root.split_evenly((3, 1));
    draw_flag_panel(
        &panels[0],
        "Average Subscription Duration by Delinquency Status",
        rows,
        |r| r.avg_duration,
        "Avg Subscription Duration (months)",
    )?;
    draw_flag_panel(
        &panels[1],
        "Average Total Charges by Delinquency Status",
        rows,
        |r| r.avg_total_charges,
        "Avg Total Charges",
    )?;
    draw_flag_panel(
        &panels[2],
        "Average Current MRR by Delinquency Status",
        rows,
        |r| r.avg_current_mrr,
        "Avg Current MRR",
    )?;

    root.present()?;
    Ok(())
}

fn draw_flag_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    rows: &[DelinquencyRow],
    value: impl Fn(&DelinquencyRow) -> f64,
    y_desc: &str,
) -> crate::Result<()> {
    let max_value = rows.iter().map(&value).fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..1.5f64, 0f64..(max_value * 1.1).max(1.0))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(2)
        .x_label_formatter(&|x| match x.round() as i64 {
            0 if (x - 0.0).abs() < 0.25 => "Not Delinquent".to_string(),
            1 if (x - 1.0).abs() < 0.25 => "Delinquent".to_string(),
            _ => String::new(),
        })
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for row in rows {
        let x = if row.is_delinquent { 1.0 } else { 0.0 };
        let color = if row.is_delinquent {
            &CONTRACTION_COLOR
        } else {
            &BAR_COLOR
        };
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.35, 0.0), (x + 0.35, value(row))],
            color.filled(),
        )))?;
    }

    Ok(())
}

/// Print the provider duration ranking as a text table
pub fn print_provider_ranking(rows: &[GroupDuration]) {
    println!("\nAverage subscription duration by provider:");
    println!("  {:<24} {:>12}", "Provider", "Avg Months");
    println!("  {:-<24} {:->12}", "", "");
    for row in rows {
        println!("  {:<24} {:>12.2}", row.group, row.avg_duration);
    }
}

/// Render all six chart artifacts under the output directory.
pub fn generate_chart_report(
    retention: &RetentionTables,
    revenue: &RevenueExpansion,
    cohorts: &CohortMatrix,
    delinquency: &[DelinquencyRow],
    out_dir: &Path,
) -> crate::Result<()> {
    render_duration_ranking(
        &retention.by_continent,
        "Average Subscription Duration by Continent",
        "Continent",
        &out_dir.join("duration_by_continent.png"),
    )?;
    render_duration_ranking(
        &retention.by_country,
        "Average Subscription Duration by Country",
        "Country",
        &out_dir.join("duration_by_country.png"),
    )?;
    render_duration_ranking(
        &retention.by_provider,
        "Average Subscription Duration by Provider",
        "Provider",
        &out_dir.join("duration_by_provider.png"),
    )?;
    render_revenue_scatter(revenue, &out_dir.join("revenue_expansion.png"))?;
    render_cohort_heatmap(cohorts, &out_dir.join("cohort_retention.png"))?;
    render_delinquency_panels(delinquency, &out_dir.join("delinquency_impact.png"))?;

    println!("Charts saved to: {}", out_dir.display());
    Ok(())
}
