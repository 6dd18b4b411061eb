//! Programmatic container fixtures shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// Number of retrieval levels written by the fixtures.
pub const LEVELS: usize = 41;

/// A measurement window written as four text fields.
#[derive(Debug, Clone)]
pub struct Window {
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
}

impl Window {
    /// A one-hour window starting at `start` (`"YYYY-MM-DD HH-MM-SS"`).
    pub fn hour_from(start: &str) -> Self {
        let t = NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H-%M-%S")
            .expect("fixture timestamp");
        let end = t + chrono::Duration::hours(1);
        Self {
            start_date: t.format("%Y-%m-%d").to_string(),
            start_time: t.format("%H-%M-%S").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            end_time: end.format("%H-%M-%S").to_string(),
        }
    }
}

/// Retrieval group contents.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub fieldname: String,
    pub convergence: Option<f64>,
    /// Value of every state vector entry.
    pub scale: f64,
    /// Value of every a priori entry.
    pub apriori: f64,
}

impl Retrieval {
    pub fn new(fieldname: &str) -> Self {
        Self {
            fieldname: fieldname.to_string(),
            convergence: None,
            scale: 1.0,
            apriori: 1.0e-6,
        }
    }

    pub fn with_convergence(mut self, value: f64) -> Self {
        self.convergence = Some(value);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Builder for one measurement/retrieval container file.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    measurement_group: String,
    window: Window,
    spectrum: Vec<f64>,
    retrieval: Option<Retrieval>,
}

impl FixtureBuilder {
    /// A file whose `measurement_group` covers one hour from `start`.
    pub fn measurement(measurement_group: &str, start: &str) -> Self {
        Self {
            measurement_group: measurement_group.to_string(),
            window: Window::hour_from(start),
            spectrum: vec![1.0, 2.0, 3.0, 4.0],
            retrieval: None,
        }
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    pub fn with_spectrum(mut self, spectrum: Vec<f64>) -> Self {
        self.spectrum = spectrum;
        self
    }

    pub fn with_retrieval(mut self, retrieval: Retrieval) -> Self {
        self.retrieval = Some(retrieval);
        self
    }

    /// Write to `dir/file_name`, creating parent directories.
    pub fn write(&self, dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dir");
        }
        let mut file = netcdf::create(&path).expect("failed to create container");

        {
            let mut group = file
                .add_group(&self.measurement_group)
                .expect("add measurement group");
            group
                .add_dimension("channel", self.spectrum.len())
                .expect("add dim channel");
            put_text(&mut group, "start_date", &self.window.start_date);
            put_text(&mut group, "start_time", &self.window.start_time);
            put_text(&mut group, "end_date", &self.window.end_date);
            put_text(&mut group, "end_time", &self.window.end_time);
            {
                let mut var = group
                    .add_variable::<f64>("y", &["channel"])
                    .expect("add var y");
                var.put_values(&self.spectrum, ..).expect("put y");
            }
            {
                let mut var = group
                    .add_variable::<f64>("tint", &[])
                    .expect("add var tint");
                var.put_values(&[30.0], ..).expect("put tint");
            }
        }

        if let Some(r) = &self.retrieval {
            let mut group = file.add_group(&r.fieldname).expect("add retrieval group");
            group.add_dimension("level", LEVELS).expect("add dim level");
            group.add_dimension("state", LEVELS + 2).expect("add dim state");
            group.add_dimension("one", 1).expect("add dim one");
            {
                let x = vec![r.scale; LEVELS + 2];
                let mut var = group
                    .add_variable::<f64>("x", &["state"])
                    .expect("add var x");
                var.put_values(&x, ..).expect("put x");
            }
            {
                let vmr = vec![r.apriori; LEVELS];
                let mut var = group
                    .add_variable::<f64>("vmr_field", &["one", "level", "one", "one"])
                    .expect("add var vmr_field");
                var.put_values(&vmr, ..).expect("put vmr_field");
            }
            {
                let z: Vec<f64> = (0..LEVELS).map(|i| i as f64 * 1000.0).collect();
                let mut var = group
                    .add_variable::<f64>("z_field", &["level", "one", "one"])
                    .expect("add var z_field");
                var.put_values(&z, ..).expect("put z_field");
            }
            put_text(&mut group, "config", "{\"fieldname\": \"retrieval\"}");
            if let Some(c) = r.convergence {
                group
                    .add_attribute("convergence", c)
                    .expect("add convergence attribute");
            }
        }

        path
    }
}

fn put_text(group: &mut netcdf::GroupMut<'_>, name: &str, text: &str) {
    let mut var = group
        .add_string_variable(name, &[])
        .expect("add string variable");
    var.put_string(text, ..).expect("put string");
}

/// Write a simulation file with two top-level fields and a nested group.
pub fn write_simulation(dir: &Path, file_name: &str, temperature: f64) -> PathBuf {
    let path = dir.join(file_name);
    let mut file = netcdf::create(&path).expect("failed to create container");
    file.add_dimension("level", 3).expect("add dim level");
    {
        let mut var = file
            .add_variable::<f64>("t_field", &["level"])
            .expect("add var t_field");
        var.put_values(&[temperature; 3], ..).expect("put t_field");
    }
    {
        let mut var = file
            .add_variable::<i32>("n_iter", &[])
            .expect("add var n_iter");
        var.put_values(&[7], ..).expect("put n_iter");
    }
    {
        let mut group = file.add_group("jacobian").expect("add group");
        let mut var = group
            .add_variable::<f64>("scale", &[])
            .expect("add var scale");
        var.put_values(&[0.5], ..).expect("put scale");
    }
    path
}

/// Write a configuration file under `<root>/assets/configs`.
pub fn write_config(root: &Path, name: &str, fieldname: &str) {
    let dir = root.join("assets").join("configs");
    std::fs::create_dir_all(&dir).expect("create config dir");
    std::fs::write(
        dir.join(name),
        format!("{{\"fieldname\": \"{}\", \"abs_lookup\": \"lut.xml\"}}", fieldname),
    )
    .expect("write config");
}
