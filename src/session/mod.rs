/// Pool-owning transcoding session.
pub mod transcoder;
