//! `InputFile` class.

use numpy::PyArray3;
use pyo3::prelude::*;
use std::path::PathBuf;

use exrio_io::ExrInputFile;

use crate::{to_numpy, to_py_err};

/// An opened EXR file.
///
/// # Example
/// ```python
/// f = exrpy.InputFile("render.exr")
/// f.channels               # ['A', 'B', 'G', 'R', 'diffuse.B', ...]
/// f.layers                 # ['diffuse']
/// rgb = f.get()            # R, G, B
/// diffuse = f.get("diffuse")
/// rgba = f.get_channels(["R", "G", "B", "A"])
/// ```
#[pyclass(name = "InputFile")]
pub struct InputFile {
    inner: ExrInputFile,
}

#[pymethods]
impl InputFile {
    /// Open a file. Raises ValueError if it is not an OpenEXR file.
    #[new]
    #[pyo3(signature = (path))]
    fn new(py: Python<'_>, path: PathBuf) -> PyResult<Self> {
        let inner = py
            .allow_threads(|| ExrInputFile::open(&path))
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Read R, G, B, or a layer or channel when `name` is given.
    ///
    /// Layers take precedence over channels of the same name.
    #[pyo3(signature = (name=None))]
    fn get<'py>(
        &self,
        py: Python<'py>,
        name: Option<&str>,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let inner = &self.inner;
        let buffer = py
            .allow_threads(|| match name {
                Some(name) => inner.get_named(name),
                None => inner.get(),
            })
            .map_err(to_py_err)?;
        to_numpy(py, buffer)
    }

    /// Read exactly the given channels, in order.
    #[pyo3(signature = (names))]
    fn get_channels<'py>(
        &self,
        py: Python<'py>,
        names: Vec<String>,
    ) -> PyResult<Bound<'py, PyArray3<f32>>> {
        let inner = &self.inner;
        let buffer = py
            .allow_threads(|| inner.get_channels(&names))
            .map_err(to_py_err)?;
        to_numpy(py, buffer)
    }

    /// All channel names.
    #[getter(channels)]
    fn channel_names(&self) -> Vec<String> {
        self.inner.channels().to_vec()
    }

    /// Layer names, sorted.
    #[getter]
    fn layers(&self) -> Vec<String> {
        self.inner.layers()
    }

    /// Data window as `(min_x, min_y, max_x, max_y)`, inclusive.
    #[getter]
    fn data_window(&self) -> (i32, i32, i32, i32) {
        let w = self.inner.data_window();
        (w.min_x(), w.min_y(), w.max_x(), w.max_y())
    }

    fn __repr__(&self) -> String {
        let w = self.inner.data_window();
        format!(
            "InputFile('{}', {}x{}, {} channels)",
            self.inner.path().display(),
            w.width(),
            w.height(),
            self.inner.channels().len()
        )
    }
}
