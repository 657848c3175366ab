pub mod buffered;
pub mod size;
pub mod stream;

pub use buffered::{decode, decode_into};
pub use size::{decompressed_size, savings, stream_stats, StreamStats};
pub use stream::{decode_range, decode_stream, decode_stream_to, decode_terminated, StreamDecoder};
