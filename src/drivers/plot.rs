use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::PlotError;
use crate::drivers::WindowColumns;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub y_range: f32,
    pub background: RGBColor,
    pub instant_color: RGBColor,
    pub average_color: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            title: "PYD1588 data".to_owned(),
            y_range: 400.0,
            background: RGBColor(10, 10, 10),
            // light grey and matplotlib's tab:orange
            instant_color: RGBColor(197, 201, 199),
            average_color: RGBColor(255, 127, 14),
        }
    }
}
/// Draws the instantaneous and average traces against relative time and
/// returns the PNG bytes.
pub fn render_window_png(window: &WindowColumns, style: &PlotStyle) -> Result<Vec<u8>, PlotError> {
    if window.is_empty() {
        return Err(PlotError::EmptyWindow);
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let x_min = window.timestamps.first().copied().unwrap_or(0) as f32;
        let x_max = window.timestamps.last().copied().unwrap_or(0) as f32;
        let x_bounds = if x_max - x_min < f32::EPSILON {
            (x_min, x_min + 1.0)
        } else {
            (x_min, x_max)
        };
        // the y hint is widened, never used to clip
        let y_peak = window
            .instants
            .iter()
            .chain(&window.averages)
            .map(|v| f32::from(*v).abs())
            .fold(style.y_range, f32::max);
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(&style.title, ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x_bounds.0..x_bounds.1, -y_peak..y_peak)?;
        chart
            .configure_mesh()
            .light_line_style(&WHITE.mix(0.1))
            .y_desc("Instant/Average Amplitude")
            .draw()?;
        let series = [
            ("instant", &window.instants, style.instant_color),
            ("average", &window.averages, style.average_color),
        ];
        for (label, values, color) in series {
            let points = window
                .timestamps
                .iter()
                .zip(values.iter())
                .map(|(&t, &v)| (t as f32, f32::from(v)));
            chart
                .draw_series(LineSeries::new(points, &color))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        chart
            .configure_series_labels()
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PlotError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| PlotError::Encode("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
