use super::*;
use byteorder::BE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use lrn_core::*;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

const MAGIC: [u8; 4] = *b"LRNB";
const VERSION: u32 = 1;
/// Longest cursor a snapshot may carry.
const MAX_CURSOR: u32 = 1024;

/// On-disk image of a [`ReplayBuffer`]:
///
/// ```text
/// magic "LRNB" | u32 version | u32 STATE_NUM | u32 ACTION_NUM
/// u8 has_cursor | [u32 len | utf-8 cursor]
/// u64 count | count × SAMPLE_WIDTH × f32
/// ```
///
/// All integers and floats are big-endian.
impl ReplayBuffer {
    /// Writes the snapshot next to `path` and renames it into place.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let temp = path.with_extension(format!("tmp.{}", std::process::id()));
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            self.write(&mut writer)?;
            writer.flush()?;
        }
        std::fs::rename(&temp, path)?;
        log::info!(
            "{:<32}{:<32}",
            "saved snapshot",
            format!("{} ({} samples)", path.display(), self.len())
        );
        Ok(())
    }

    /// Loads a snapshot if one exists at `path`.
    pub fn load(path: &Path, max_length: usize) -> Result<Option<Self>, SnapshotError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let buffer = Self::read(&mut BufReader::new(file), max_length)?;
        log::info!(
            "{:<32}{:<32}",
            "loaded snapshot",
            format!("{} ({} samples)", path.display(), buffer.len())
        );
        Ok(Some(buffer))
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), SnapshotError> {
        writer.write_all(&MAGIC)?;
        writer.write_u32::<BE>(VERSION)?;
        writer.write_u32::<BE>(STATE_NUM as u32)?;
        writer.write_u32::<BE>(ACTION_NUM as u32)?;
        match self.cursor() {
            Some(cursor) => {
                writer.write_u8(1)?;
                writer.write_u32::<BE>(cursor.len() as u32)?;
                writer.write_all(cursor.as_bytes())?;
            }
            None => writer.write_u8(0)?,
        }
        writer.write_u64::<BE>(self.len() as u64)?;
        for x in self.iter().flat_map(Sample::row) {
            writer.write_f32::<BE>(x)?;
        }
        Ok(())
    }

    /// Reads a snapshot into a buffer of `max_length`, keeping the newest samples that fit.
    pub fn read<R: Read>(reader: &mut R, max_length: usize) -> Result<Self, SnapshotError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(SnapshotError::Magic);
        }
        match reader.read_u32::<BE>()? {
            VERSION => {}
            other => return Err(SnapshotError::Version(other)),
        }
        let state = reader.read_u32::<BE>()?;
        let action = reader.read_u32::<BE>()?;
        if (state as usize, action as usize) != (STATE_NUM, ACTION_NUM) {
            return Err(SnapshotError::Shape { state, action });
        }
        let cursor = match reader.read_u8()? {
            0 => None,
            _ => {
                let len = reader.read_u32::<BE>()?;
                if len > MAX_CURSOR {
                    return Err(SnapshotError::CursorLength(len));
                }
                let mut bytes = vec![0u8; len as usize];
                reader.read_exact(&mut bytes)?;
                Some(String::from_utf8(bytes)?)
            }
        };
        let count = reader.read_u64::<BE>()? as usize;
        let skip = count.saturating_sub(max_length);
        let mut row = [0 as Scalar; SAMPLE_WIDTH];
        let mut samples = Vec::with_capacity(count - skip);
        for i in 0..count {
            reader.read_f32_into::<BE>(&mut row)?;
            if i >= skip {
                if let Ok(sample) = Sample::try_from(&row[..]) {
                    samples.push(sample);
                }
            }
        }
        Ok(Self::restore(max_length, cursor, samples))
    }
}
