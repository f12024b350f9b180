//! Python bindings for exrio.
//!
//! Exposes the `exrpy` module: `is_exr_file`, `read`, `write` and the
//! `InputFile` class. Buffers cross the boundary as `float32` numpy arrays
//! of shape `(height, width, channels)`.

use numpy::{
    AllowTypeChange, IntoPyArray, PyArray3, PyArrayLikeDyn, PyArrayMethods, PyUntypedArrayMethods,
};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

use exrio_core::{Error, PixelBuffer};

mod input_file;

pub use input_file::InputFile;

/// Maps library errors onto Python exceptions.
///
/// Problems with the request become `ValueError`; failures while moving
/// pixels become `IOError`.
pub(crate) fn to_py_err(err: Error) -> PyErr {
    if err.is_transfer_error() {
        PyIOError::new_err(err.to_string())
    } else {
        PyValueError::new_err(err.to_string())
    }
}

/// Converts an interleaved buffer into a `(height, width, channels)` array.
pub(crate) fn to_numpy<'py>(
    py: Python<'py>,
    buffer: PixelBuffer,
) -> PyResult<Bound<'py, PyArray3<f32>>> {
    let [h, w, c] = buffer.shape();
    buffer
        .into_vec()
        .into_pyarray(py)
        .reshape([h, w, c])
        .map_err(|e| PyValueError::new_err(format!("Reshape failed: {}", e)))
}

/// Check whether a file is a readable OpenEXR file.
///
/// Never raises; unreadable or missing files return False.
#[pyfunction]
#[pyo3(signature = (path))]
fn is_exr_file(py: Python<'_>, path: PathBuf) -> bool {
    py.allow_threads(|| exrio_io::is_exr_file(&path))
}

/// Read the R, G, B channels of an EXR file.
///
/// # Example
/// ```python
/// rgb = exrpy.read("render.exr")   # float32, (h, w, 3)
/// ```
#[pyfunction]
#[pyo3(signature = (path))]
fn read<'py>(py: Python<'py>, path: PathBuf) -> PyResult<Bound<'py, PyArray3<f32>>> {
    let buffer = py.allow_threads(|| exrio_io::read(&path)).map_err(to_py_err)?;
    to_numpy(py, buffer)
}

/// Write a (height, width, channels) array as an RGB or RGBA float image.
///
/// Channels 0..3 become R, G, B; channel 3, if present, becomes A. Further
/// channels are not written. Any numeric array or nested sequence is
/// accepted and converted to float32 first.
///
/// # Example
/// ```python
/// exrpy.write("out.exr", np.zeros((1080, 1920, 4), dtype=np.float32))
/// exrpy.write("noise.exr", np.random.rand(64, 64, 3))   # float64 works too
/// ```
#[pyfunction]
#[pyo3(signature = (path, array))]
fn write(
    py: Python<'_>,
    path: PathBuf,
    array: PyArrayLikeDyn<'_, f32, AllowTypeChange>,
) -> PyResult<()> {
    let shape = array.shape().to_vec();
    // logical (C) order regardless of the array's strides
    let data: Vec<f32> = array.as_array().iter().copied().collect();
    py.allow_threads(|| exrio_io::write_array(&path, &shape, data))
        .map_err(to_py_err)
}

/// exrpy - OpenEXR channel and layer access for numpy
#[pymodule]
fn exrpy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    m.add_class::<InputFile>()?;

    m.add_function(wrap_pyfunction!(is_exr_file, m)?)?;
    m.add_function(wrap_pyfunction!(read, m)?)?;
    m.add_function(wrap_pyfunction!(write, m)?)?;

    Ok(())
}
