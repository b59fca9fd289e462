//! OSC 1.0 message encoding
//!
//! A message is the NUL-padded address pattern, a `,`-led type tag string
//! (also NUL-padded), then the arguments, each big-endian and 4-byte
//! aligned.

/// One OSC argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscArg {
    Int(i32),
    Float(f32),
}

impl OscArg {
    fn type_tag(&self) -> char {
        match self {
            OscArg::Int(_) => 'i',
            OscArg::Float(_) => 'f',
        }
    }
}

/// Appends `data` followed by 1 to 4 NUL bytes, so the terminated string
/// ends on a 4-byte boundary.
fn push_padded(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(data);
    let pad = 4 - data.len() % 4;
    buf.extend(std::iter::repeat(0u8).take(pad));
}

/// Encodes one OSC message.
pub fn encode_message(path: &str, args: &[OscArg]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(path.len() + args.len() * 4 + 16);

    push_padded(&mut buf, path.as_bytes());

    let mut tags = String::with_capacity(args.len() + 1);
    tags.push(',');
    for arg in args {
        tags.push(arg.type_tag());
    }
    push_padded(&mut buf, tags.as_bytes());

    for arg in args {
        match *arg {
            OscArg::Int(value) => buf.extend_from_slice(&value.to_be_bytes()),
            OscArg::Float(value) => buf.extend_from_slice(&value.to_be_bytes()),
        }
    }

    buf
}
