use std::io::Cursor;
use std::path::Path;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::{DashedLineSeries, LineSeries};
use plotters::prelude::*;
use crate::drivers::error::PlotError;
use crate::drivers::ChartFrame;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
    /// Title, tick labels and legend. Needs a system sans-serif font.
    pub text: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 480,
            background: WHITE,
            palette: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
            ],
            text: true,
        }
    }
}
pub fn render_frame_png(frame: &ChartFrame, style: &PlotStyle) -> Result<Vec<u8>, PlotError> {
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x_min, x_max) = frame.x_bounds();
        let (y_min, y_max) = frame.y_bounds();
        let mut builder = ChartBuilder::on(&root);
        builder.margin(20);
        if style.text {
            builder
                .caption(&frame.title, ("sans-serif", 22).into_font().color(&BLACK))
                .set_label_area_size(LabelAreaPosition::Left, 50)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(x_min..x_max, y_min..y_max)?;
        // axes and ticks only; the grid is drawn dotted below
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh();
        if style.text {
            mesh.x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            );
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw()?;
        let grid = BLACK.mix(0.3).stroke_width(1);
        for x in grid_lines(x_min, x_max, 10) {
            chart.draw_series(DashedLineSeries::new(vec![(x, y_min), (x, y_max)], 1, 3, grid))?;
        }
        for y in grid_lines(y_min, y_max, 5) {
            chart.draw_series(DashedLineSeries::new(vec![(x_min, y), (x_max, y)], 1, 3, grid))?;
        }
        for (idx, series) in frame.series.iter().enumerate() {
            let color = style.palette[idx % style.palette.len()];
            let points = series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v));
            let drawn = chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?;
            if style.text {
                drawn
                    .label(series.label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
            }
        }
        if style.text && !frame.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .border_style(&BLACK.mix(0.3))
                .background_style(&WHITE.mix(0.8))
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Renders `frame` and replaces `path` with the result.
pub fn write_frame_png(frame: &ChartFrame, style: &PlotStyle, path: &Path) -> Result<(), PlotError> {
    let png = render_frame_png(frame, style)?;
    std::fs::write(path, png)?;
    Ok(())
}
/// Round-valued positions (1, 2 or 5 times a power of ten apart) for about
/// `target` grid lines between `min` and `max`.
fn grid_lines(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = max - min;
    if !(span > 0.0 && span.is_finite()) || target == 0 {
        return Vec::new();
    }
    let raw = span / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude);
    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PlotError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| PlotError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
