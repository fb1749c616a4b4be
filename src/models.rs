use chrono::NaiveDate;

/// One day's forecast record for a city
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub temp_avg: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

/// Forecast points for one city in the order they were received
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CityForecast {
    pub points: Vec<ForecastPoint>,
}

/// Aligned per-field sequences of a city forecast, all of equal length
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForecastSeries {
    pub dates: Vec<NaiveDate>,
    pub avg_temperatures: Vec<f64>,
    pub min_temperatures: Vec<f64>,
    pub max_temperatures: Vec<f64>,
    pub humidity: Vec<f64>,
    pub wind_speed: Vec<f64>,
}

impl CityForecast {
    pub fn new(points: Vec<ForecastPoint>) -> CityForecast {
        CityForecast { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Splits the forecast into six aligned sequences
    ///
    pub fn series(&self) -> ForecastSeries {
        let mut series = ForecastSeries::default();

        for p in self.points.iter() {
            series.dates.push(p.date);
            series.avg_temperatures.push(p.temp_avg);
            series.min_temperatures.push(p.temp_min);
            series.max_temperatures.push(p.temp_max);
            series.humidity.push(p.humidity);
            series.wind_speed.push(p.wind_speed);
        }

        series
    }
}

/// City forecasts keyed by city name, iterated in insertion order
#[derive(Clone, Debug, Default)]
pub struct CityForecastCollection {
    cities: Vec<(String, CityForecast)>,
}

impl CityForecastCollection {
    pub fn new() -> CityForecastCollection {
        CityForecastCollection { cities: Vec::new() }
    }

    /// Adds a city forecast, replacing in place any forecast already held for the city
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city
    /// * 'forecast' - the city's forecast
    pub fn insert(&mut self, city: &str, forecast: CityForecast) {
        match self.cities.iter_mut().find(|(name, _)| name == city) {
            Some((_, existing)) => *existing = forecast,
            None => self.cities.push((city.to_string(), forecast)),
        }
    }

    pub fn get(&self, city: &str) -> Option<&CityForecast> {
        self.cities.iter().find(|(name, _)| name == city).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CityForecast)> {
        self.cities.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
