use std::ops::Range;
use std::path::{Path, PathBuf};
use chrono::{Days, NaiveDate};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;
use crate::config::{ChartLabels, ChartParameters};
use crate::models::{CityForecastCollection, ForecastSeries};

const FONT: &str = "sans-serif";
const HUMIDITY_COLOR: RGBColor = RGBColor(31, 119, 180);
const WIND_COLOR: RGBColor = RGBColor(44, 160, 44);

/// Struct for rendering forecast charts to PNG files
pub struct Charts {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    labels: ChartLabels,
}

impl Charts {
    /// Returns a Charts struct that writes images to the given directory
    ///
    /// # Arguments
    ///
    /// * 'config' - chart configuration
    /// * 'output_dir' - directory to write chart images to
    pub fn new(config: &ChartParameters, output_dir: &Path) -> Charts {
        Charts {
            output_dir: output_dir.to_path_buf(),
            width: config.width,
            height: config.height,
            labels: config.labels.clone(),
        }
    }

    /// Renders average temperature per city against date, with a band between min and max
    /// temperature for each city, all in one chart. Cities without forecast points are
    /// left out of the chart.
    ///
    /// # Arguments
    ///
    /// * 'cities' - forecasts to compare
    /// * 'run_date' - date to embed in the file name
    pub fn temperature_comparison(&self, cities: &CityForecastCollection, run_date: NaiveDate) -> Result<PathBuf, ChartError> {
        let series: Vec<(usize, &str, ForecastSeries)> = cities.iter()
            .enumerate()
            .filter(|(_, (_, f))| !f.is_empty())
            .map(|(idx, (city, f))| (idx, city, f.series()))
            .collect();

        let x_range = date_range(series.iter().flat_map(|(_, _, s)| s.dates.iter().copied()))
            .ok_or(ChartError::NoData("no forecast points for any city".into()))?;
        let y_range = value_range(series.iter().flat_map(|(_, _, s)| s.min_temperatures.iter()
            .chain(s.max_temperatures.iter())
            .chain(s.avg_temperatures.iter())
            .copied()))
            .ok_or(ChartError::NoData("no temperatures for any city".into()))?;

        let path = self.output_dir.join(temperature_file_name(run_date));
        {
            let root = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&self.labels.temperature_title, (FONT, 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .build_cartesian_2d(x_range, y_range)?;

            chart.configure_mesh()
                .x_desc(&self.labels.date_axis)
                .y_desc(&self.labels.temperature_axis)
                .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
                .draw()?;

            for (idx, city, s) in series.iter() {
                let color = Palette99::pick(*idx).to_rgba();

                let band: Vec<(NaiveDate, f64)> = s.dates.iter().copied().zip(s.max_temperatures.iter().copied())
                    .chain(s.dates.iter().copied().zip(s.min_temperatures.iter().copied()).rev())
                    .collect();
                chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.2).filled())))?;

                let avg: Vec<(NaiveDate, f64)> = s.dates.iter().copied().zip(s.avg_temperatures.iter().copied()).collect();
                chart.draw_series(LineSeries::new(avg, color.stroke_width(2)).point_size(4))?
                    .label(format!("{} {}", city, self.labels.avg_temperature_legend))
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }

            chart.configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;

            root.present()?;
        }

        Ok(path)
    }

    /// Renders humidity on a left axis and wind speed on a right axis for one city
    ///
    /// # Arguments
    ///
    /// * 'cities' - forecasts to pick the city from
    /// * 'city' - the city to render
    /// * 'run_date' - date to embed in the file name
    pub fn humidity_and_wind(&self, cities: &CityForecastCollection, city: &str, run_date: NaiveDate) -> Result<PathBuf, ChartError> {
        let forecast = cities.get(city)
            .ok_or(ChartError::UnknownCity(city.to_string()))?;
        let series = forecast.series();

        let x_range = date_range(series.dates.iter().copied())
            .ok_or(ChartError::NoData(format!("no forecast points for {}", city)))?;
        let humidity_range = value_range(series.humidity.iter().copied())
            .ok_or(ChartError::NoData(format!("no humidity values for {}", city)))?;
        let wind_range = value_range(series.wind_speed.iter().copied())
            .ok_or(ChartError::NoData(format!("no wind speed values for {}", city)))?;

        let path = self.output_dir.join(wind_file_name(run_date));
        {
            let root = BitMapBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(self.labels.wind_title.replace("{city}", city), (FONT, 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .right_y_label_area_size(60)
                .build_cartesian_2d(x_range.clone(), humidity_range)?
                .set_secondary_coord(x_range, wind_range);

            chart.configure_mesh()
                .x_desc(&self.labels.date_axis)
                .y_desc(&self.labels.humidity_axis)
                .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
                .y_label_style((FONT, 15).into_font().color(&HUMIDITY_COLOR))
                .draw()?;

            chart.configure_secondary_axes()
                .y_desc(&self.labels.wind_axis)
                .label_style((FONT, 15).into_font().color(&WIND_COLOR))
                .draw()?;

            let humidity: Vec<(NaiveDate, f64)> = series.dates.iter().copied().zip(series.humidity.iter().copied()).collect();
            let wind: Vec<(NaiveDate, f64)> = series.dates.iter().copied().zip(series.wind_speed.iter().copied()).collect();

            chart.draw_series(LineSeries::new(humidity, HUMIDITY_COLOR.stroke_width(2)).point_size(4))?
                .label(&self.labels.humidity_legend)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], HUMIDITY_COLOR.stroke_width(2)));

            chart.draw_secondary_series(DashedLineSeries::new(wind.clone(), 10, 6, WIND_COLOR.stroke_width(2)))?
                .label(&self.labels.wind_legend)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], WIND_COLOR.stroke_width(2)));
            chart.draw_secondary_series(wind.into_iter().map(|c| Cross::new(c, 5, WIND_COLOR.stroke_width(2))))?;

            chart.configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;

            root.present()?;
        }

        Ok(path)
    }
}

/// File name of the temperature comparison chart for a given run date
pub fn temperature_file_name(run_date: NaiveDate) -> String {
    format!("temperature-{}.png", run_date.format("%Y-%m-%d"))
}

/// File name of the humidity and wind chart for a given run date
pub fn wind_file_name(run_date: NaiveDate) -> String {
    format!("wind-{}.png", run_date.format("%Y-%m-%d"))
}

/// Returns a date range spanning all dates, padded with one day on each side
///
/// # Arguments
///
/// * 'dates' - dates to span
fn date_range(dates: impl Iterator<Item = NaiveDate>) -> Option<Range<NaiveDate>> {
    let (min, max) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
        None => Some((d, d)),
        Some((min, max)) => Some((min.min(d), max.max(d))),
    })?;

    let start = min.checked_sub_days(Days::new(1)).unwrap_or(min);
    let end = max.checked_add_days(Days::new(1)).unwrap_or(max);

    Some(start..end)
}

/// Returns a value range spanning all values, padded by a tenth of the span but
/// at least by one unit so that constant series still get a usable axis
///
/// # Arguments
///
/// * 'values' - values to span
fn value_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })?;

    let pad = ((max - min) * 0.1).max(1.0);

    Some((min - pad)..(max + pad))
}

/// Error depicting errors that occur while rendering charts
///
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("UnknownCity: {0}")]
    UnknownCity(String),
    #[error("NoData: {0}")]
    NoData(String),
    #[error("DrawingError: {0}")]
    DrawingError(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ChartError::DrawingError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CityForecast, ForecastPoint};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    fn forecast(days: u32, base: f64) -> CityForecast {
        CityForecast::new((0..days).map(|i| ForecastPoint {
            date: date(3 + i),
            temp_avg: base + i as f64,
            temp_min: base + i as f64 - 4.0,
            temp_max: base + i as f64 + 4.0,
            humidity: 50.0 + 3.0 * i as f64,
            wind_speed: 2.0 + 0.5 * i as f64,
        }).collect())
    }

    fn charts(dir: &Path) -> Charts {
        let config = ChartParameters {
            detail_city: "Moscow".into(),
            width: 640,
            height: 360,
            labels: ChartLabels::default(),
        };
        Charts::new(&config, dir)
    }

    #[test]
    fn file_names_embed_run_date() {
        assert_eq!(temperature_file_name(date(3)), "temperature-2024-09-03.png");
        assert_eq!(wind_file_name(date(3)), "wind-2024-09-03.png");
    }

    #[test]
    fn date_range_is_padded() {
        let range = date_range(vec![date(5), date(3), date(9)].into_iter()).unwrap();
        assert_eq!(range, date(2)..date(10));
        assert!(date_range(std::iter::empty()).is_none());
    }

    #[test]
    fn value_range_handles_constant_series() {
        assert_eq!(value_range(vec![3.0, 3.0].into_iter()), Some(2.0..4.0));
        assert_eq!(value_range(vec![0.0, 50.0, 20.0].into_iter()), Some(-5.0..55.0));
        assert_eq!(value_range(vec![f64::NAN].into_iter()), None);
    }

    #[test]
    fn comparison_renders_single_city() {
        let dir = tempfile::tempdir().unwrap();
        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", forecast(7, 18.0));

        let path = charts(dir.path()).temperature_comparison(&cities, date(3)).unwrap();

        assert_eq!(path, dir.path().join("temperature-2024-09-03.png"));
        assert!(fs_len(&path) > 0);
    }

    #[test]
    fn comparison_renders_several_cities() {
        let dir = tempfile::tempdir().unwrap();
        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", forecast(7, 18.0));
        cities.insert("Saint Petersburg", forecast(7, 14.0));
        cities.insert("Volgograd", forecast(1, 27.0));

        let path = charts(dir.path()).temperature_comparison(&cities, date(3)).unwrap();

        assert!(fs_len(&path) > 0);
    }

    #[test]
    fn comparison_skips_city_without_points() {
        let dir = tempfile::tempdir().unwrap();
        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", forecast(1, 18.0));
        cities.insert("Volgograd", CityForecast::default());

        let path = charts(dir.path()).temperature_comparison(&cities, date(3)).unwrap();

        assert_eq!(path, dir.path().join("temperature-2024-09-03.png"));
        assert!(fs_len(&path) > 0);
    }

    #[test]
    fn comparison_without_data_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = charts(dir.path()).temperature_comparison(&CityForecastCollection::new(), date(3));
        assert!(matches!(result, Err(ChartError::NoData(_))));

        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", CityForecast::default());
        cities.insert("Volgograd", CityForecast::default());
        let result = charts(dir.path()).temperature_comparison(&cities, date(3));
        assert!(matches!(result, Err(ChartError::NoData(_))));
        assert!(!dir.path().join("temperature-2024-09-03.png").exists());
    }

    #[test]
    fn humidity_and_wind_renders_selected_city() {
        let dir = tempfile::tempdir().unwrap();
        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", forecast(7, 18.0));
        cities.insert("Volgograd", forecast(7, 27.0));

        let path = charts(dir.path()).humidity_and_wind(&cities, "Moscow", date(3)).unwrap();

        assert_eq!(path, dir.path().join("wind-2024-09-03.png"));
        assert!(fs_len(&path) > 0);
    }

    #[test]
    fn humidity_and_wind_unknown_city_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", forecast(7, 18.0));

        let result = charts(dir.path()).humidity_and_wind(&cities, "Paris", date(3));
        assert!(matches!(result, Err(ChartError::UnknownCity(c)) if c == "Paris"));
    }

    #[test]
    fn missing_output_dir_is_a_drawing_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut cities = CityForecastCollection::new();
        cities.insert("Moscow", forecast(3, 18.0));

        let result = charts(&dir.path().join("missing")).humidity_and_wind(&cities, "Moscow", date(3));
        assert!(matches!(result, Err(ChartError::DrawingError(_))));
    }

    fn fs_len(path: &Path) -> u64 {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}
