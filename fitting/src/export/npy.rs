//! NumPy `.npy` table files

use crate::table::*;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use regex::Regex;
use sheen_core::pbrt::*;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::OnceLock;

/// Magic string at the start of every `.npy` file.
const NPY_MAGIC: &[u8] = b"\x93NUMPY";

/// Header alignment used by NumPy.
const NPY_ALIGNMENT: usize = 64;

/// Largest header accepted when reading, NumPy's default `max_header_size`.
const MAX_HEADER_LEN: usize = 10000;

/// Write the table as a little endian `float64` array of shape
/// `(mu_res, alpha_res, 3)` in C order.
///
/// * `path`  - Output file path.
/// * `table` - The table.
pub fn write_npy(path: &str, table: &LtcTable) -> Result<(), String> {
    info!("Writing table {path} with shape {:?}", table.shape());

    let file = File::create(path).map_err(|e| format!("write_npy(): Error creating '{path}': {e}"))?;
    let mut writer = BufWriter::new(file);
    encode_npy(&mut writer, table).map_err(|e| format!("write_npy(): Error writing '{path}': {e}"))?;
    writer
        .flush()
        .map_err(|e| format!("write_npy(): Error writing '{path}': {e}"))
}

/// Read a table written by `write_npy()` or by NumPy. The array must have
/// shape `(mu_res, alpha_res, 3)` and hold `float64` or `float32` values in C
/// order.
///
/// * `path` - Input file path.
pub fn read_npy(path: &str) -> Result<LtcTable, String> {
    let file = File::open(path).map_err(|e| format!("read_npy(): Error reading '{path}': {e}"))?;
    let table = decode_npy(&mut BufReader::new(file)).map_err(|e| format!("read_npy(): '{path}': {e}"))?;

    info!("Read table {path} with shape {:?}", table.shape());
    Ok(table)
}

/// Returns the version 1.0 header: the dictionary padded with spaces and a
/// newline so the data starts on a 64 byte boundary.
///
/// * `shape` - Array shape.
fn npy_header(shape: (usize, usize, usize)) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}, {}), }}",
        shape.0, shape.1, shape.2
    );

    // Magic, 2 version bytes, 2 length bytes, dictionary and newline.
    let unpadded = NPY_MAGIC.len() + 4 + dict.len() + 1;
    let padding = (NPY_ALIGNMENT - unpadded % NPY_ALIGNMENT) % NPY_ALIGNMENT;

    let mut header = dict.into_bytes();
    header.resize(header.len() + padding, b' ');
    header.push(b'\n');
    header
}

/// Encode the table.
///
/// * `writer` - Output stream.
/// * `table`  - The table.
fn encode_npy<W: Write>(writer: &mut W, table: &LtcTable) -> std::io::Result<()> {
    let header = npy_header(table.shape());

    writer.write_all(NPY_MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_u16::<LittleEndian>(header.len() as u16)?;
    writer.write_all(&header)?;
    for &v in table.data() {
        writer.write_f64::<LittleEndian>(v)?;
    }
    Ok(())
}

/// Returns regular expressions for the `descr`, `fortran_order` and `shape`
/// header entries.
fn regex_header() -> &'static (Regex, Regex, Regex) {
    static DATA: OnceLock<(Regex, Regex, Regex)> = OnceLock::new();
    DATA.get_or_init(|| {
        (
            Regex::new(r"'descr'\s*:\s*'([^']*)'").expect("valid descr regex"),
            Regex::new(r"'fortran_order'\s*:\s*(True|False)").expect("valid fortran_order regex"),
            Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").expect("valid shape regex"),
        )
    })
}

/// Decode a table.
///
/// * `reader` - Input stream.
fn decode_npy<R: Read>(reader: &mut R) -> Result<LtcTable, String> {
    let mut magic = [0_u8; 6];
    reader
        .read_exact(&mut magic)
        .map_err(|e| format!("Error reading magic string: {e}"))?;
    if &magic[..] != NPY_MAGIC {
        return Err("Not a .npy file".to_string());
    }

    let major = reader.read_u8().map_err(|e| format!("Error reading version: {e}"))?;
    let _minor = reader.read_u8().map_err(|e| format!("Error reading version: {e}"))?;
    let header_len = match major {
        1 => reader.read_u16::<LittleEndian>().map(usize::from),
        2 | 3 => reader.read_u32::<LittleEndian>().map(|n| n as usize),
        v => return Err(format!("Unsupported .npy version {v}")),
    }
    .map_err(|e| format!("Error reading header length: {e}"))?;
    if header_len > MAX_HEADER_LEN {
        return Err(format!("Header length {header_len} exceeds {MAX_HEADER_LEN} bytes"));
    }

    let mut header = vec![0_u8; header_len];
    reader
        .read_exact(&mut header)
        .map_err(|e| format!("Error reading header: {e}"))?;
    let header = String::from_utf8_lossy(&header);

    let (re_descr, re_fortran, re_shape) = regex_header();
    let descr = re_descr
        .captures(&header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or("Header has no 'descr'")?;
    let fortran_order = re_fortran
        .captures(&header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str() == "True")
        .ok_or("Header has no 'fortran_order'")?;
    let shape = re_shape
        .captures(&header)
        .and_then(|c| c.get(1))
        .ok_or("Header has no 'shape'")?
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|e| format!("Invalid shape entry '{s}': {e}")))
        .collect::<Result<Vec<usize>, String>>()?;

    if descr != "<f8" && descr != "<f4" {
        return Err(format!("Unsupported data type '{descr}'"));
    }
    if fortran_order {
        return Err("Fortran ordered arrays are not supported".to_string());
    }
    if shape.len() != 3 || shape[2] != PARAMS_PER_ENTRY {
        return Err(format!("Expected shape (mu, alpha, {PARAMS_PER_ENTRY}), found {shape:?}"));
    }

    let n = shape
        .iter()
        .try_fold(1_usize, |n, &d| n.checked_mul(d))
        .ok_or_else(|| format!("Shape {shape:?} is too large"))?;

    // Grow as values are read so a short file fails before a large allocation.
    let mut data = Vec::new();
    for i in 0..n {
        let v = if descr == "<f8" {
            reader.read_f64::<LittleEndian>()
        } else {
            reader.read_f32::<LittleEndian>().map(Float::from)
        }
        .map_err(|e| format!("Error reading value {i}: {e}"))?;
        data.push(v);
    }

    LtcTable::from_data(shape[0], shape[1], data)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::LtcParams;

    fn sample_table() -> LtcTable {
        let mut table = LtcTable::new(2, 3);
        for mu_idx in 0..2 {
            for alpha_idx in 0..3 {
                let k = (mu_idx * 3 + alpha_idx) as Float;
                table.set(mu_idx, alpha_idx, &LtcParams::new(k, -0.01 * k, 0.1 * k + 0.5));
            }
        }
        table
    }

    #[test]
    fn header_is_aligned() {
        let mut bytes = vec![];
        encode_npy(&mut bytes, &sample_table()).unwrap();

        assert_eq!(&bytes[..6], NPY_MAGIC);
        assert_eq!(&bytes[6..8], &[1, 0]);
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        assert_eq!((10 + header_len) % NPY_ALIGNMENT, 0);
        assert_eq!(bytes[10 + header_len - 1], b'\n');
        assert_eq!(bytes.len(), 10 + header_len + 18 * 8);

        let header = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
        assert!(header.starts_with("{'descr': '<f8', 'fortran_order': False, 'shape': (2, 3, 3), }"));
    }

    #[test]
    fn file_round_trip() {
        let table = sample_table();
        let path = std::env::temp_dir()
            .join(format!("sheen-ltc-npy-{}.npy", std::process::id()))
            .to_str()
            .unwrap()
            .to_string();

        write_npy(&path, &table).unwrap();
        let read = read_npy(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn reads_float32_numpy_header() {
        let header = b"{'descr': '<f4', 'fortran_order': False, 'shape': (1, 1, 3), }      \n";
        let mut bytes = NPY_MAGIC.to_vec();
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header);
        for v in [0.5_f32, -0.25, 1.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }

        let table = decode_npy(&mut bytes.as_slice()).unwrap();
        assert_eq!(table.get(0, 0), LtcParams::new(0.5, -0.25, 1.0));
    }

    #[test]
    fn invalid_files_are_rejected() {
        assert!(decode_npy(&mut &b"NOTNPY"[..]).is_err());

        let mut truncated = vec![];
        encode_npy(&mut truncated, &sample_table()).unwrap();
        truncated.truncate(truncated.len() - 4);
        assert!(decode_npy(&mut truncated.as_slice()).is_err());

        let header = b"{'descr': '<f8', 'fortran_order': False, 'shape': (4, 4), }\n";
        let mut bytes = NPY_MAGIC.to_vec();
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header);
        assert!(decode_npy(&mut bytes.as_slice()).unwrap_err().contains("shape"));

        assert!(read_npy("/this/path/does/not/exist.npy").is_err());
    }

    fn npy_bytes(version: u8, header: &[u8]) -> Vec<u8> {
        let mut bytes = NPY_MAGIC.to_vec();
        bytes.extend_from_slice(&[version, 0]);
        if version == 1 {
            bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        } else {
            bytes.extend_from_slice(&(header.len() as u32).to_le_bytes());
        }
        bytes.extend_from_slice(header);
        bytes
    }

    #[test]
    fn oversized_shapes_are_rejected() {
        let header = b"{'descr': '<f8', 'fortran_order': False, 'shape': (4000000000000000000, 4000000000000000000, 3), }\n";
        let err = decode_npy(&mut npy_bytes(1, header).as_slice()).unwrap_err();
        assert!(err.contains("too large"), "{err}");

        // A plausible shape without the data behind it fails on the missing
        // values instead of allocating them up front.
        let header = b"{'descr': '<f8', 'fortran_order': False, 'shape': (1000000000, 1000000000, 3), }\n";
        let mut bytes = npy_bytes(1, header);
        bytes.extend_from_slice(&1.0_f64.to_le_bytes());
        let err = decode_npy(&mut bytes.as_slice()).unwrap_err();
        assert!(err.contains("value 1"), "{err}");
    }

    #[test]
    fn oversized_headers_are_rejected() {
        let mut bytes = NPY_MAGIC.to_vec();
        bytes.extend_from_slice(&[2, 0]);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = decode_npy(&mut bytes.as_slice()).unwrap_err();
        assert!(err.contains("exceeds"), "{err}");

        let header = b"{'descr': '<f8', 'fortran_order': False, 'shape': (1, 1, 3), }\n";
        let mut bytes = npy_bytes(2, header);
        for v in [0.5_f64, -0.25, 1.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        assert_eq!(
            decode_npy(&mut bytes.as_slice()).unwrap().get(0, 0),
            LtcParams::new(0.5, -0.25, 1.0)
        );
    }
}
