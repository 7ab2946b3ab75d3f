use super::*;
use byteorder::BE;
use byteorder::ByteOrder;
use byteorder::ReadBytesExt;
use lrn_core::*;

const MAGIC: [u8; 4] = *b"LRNW";
const VERSION: u32 = 1;

/// Published bytes that do not decode into a [`LinearModel`].
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("truncated artifact: {0}")]
    Truncated(#[from] std::io::Error),
    #[error("not a linear model artifact")]
    Magic,
    #[error("unsupported artifact version {0}")]
    Version(u32),
    #[error("artifact shape ({state}, {action}) does not match this build")]
    Shape { state: u32, action: u32 },
}

/// `"LRNW" | u32 version | u32 STATE_NUM | u32 ACTION_NUM | PARAMETERS × f32`, big-endian.
pub fn encode(model: &LinearModel) -> Vec<u8> {
    let mut bytes = vec![0u8; 16 + 4 * PARAMETERS];
    bytes[..4].copy_from_slice(&MAGIC);
    BE::write_u32_into(
        &[VERSION, STATE_NUM as u32, ACTION_NUM as u32],
        &mut bytes[4..16],
    );
    BE::write_f32_into(model.parameters(), &mut bytes[16..]);
    bytes
}

pub fn decode(mut bytes: &[u8]) -> Result<LinearModel, ArtifactError> {
    let mut magic = [0u8; 4];
    std::io::Read::read_exact(&mut bytes, &mut magic)?;
    if magic != MAGIC {
        return Err(ArtifactError::Magic);
    }
    match bytes.read_u32::<BE>()? {
        VERSION => {}
        other => return Err(ArtifactError::Version(other)),
    }
    let state = bytes.read_u32::<BE>()?;
    let action = bytes.read_u32::<BE>()?;
    if (state as usize, action as usize) != (STATE_NUM, ACTION_NUM) {
        return Err(ArtifactError::Shape { state, action });
    }
    let mut parameters = vec![0 as Scalar; PARAMETERS];
    bytes.read_f32_into::<BE>(&mut parameters)?;
    LinearModel::from_parameters(parameters).ok_or(ArtifactError::Shape { state, action })
}
