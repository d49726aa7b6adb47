//! Document decoding: the frame loop and the chunk dispatcher

use tracing::{debug, trace, warn};

use crate::chunk::{ChunkHeader, ChunkType, FrameHeader, FRAME_HEADER_SIZE};
use crate::chunks::palette::PaletteKind;
use crate::pixels::ScratchPool;
use crate::{
    ByteCursor, Cel, ColorDepth, ColorProfile, Document, Error, Frame, FrameTag, Header, Layer,
    Palette, Result, UserData,
};

/// Decodes a complete file into a [`Document`]
///
/// Any failure aborts the whole decode; no partial document is returned.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Document> {
    let mut cursor = ByteCursor::new(bytes);
    let header = Header::read(&mut cursor)?;
    debug!(
        frames = header.frame_count,
        width = header.width,
        height = header.height,
        depth = ?header.color_depth,
        "decoded header"
    );

    let mut decoder = DocumentDecoder::new(&header);
    let mut frames = Vec::with_capacity(usize::from(header.frame_count));
    for index in 0..header.frame_count {
        frames.push(decoder.decode_frame(&mut cursor, index)?);
    }

    Ok(Document {
        header,
        frames,
        layers: decoder.layers,
        tags: decoder.tags,
        user_data: decoder.sprite_user_data,
    })
}

/// The entity the next user data chunk attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserDataOwner {
    /// Nothing owner-capable seen yet in this frame
    Sprite,
    Layer(usize),
    /// Index into the current frame's cels
    Cel(usize),
    /// Tags from a tags chunk, assigned one per user data chunk
    Tags { next: usize, end: usize },
}

/// Parse state shared by the frames of one decode call
struct DocumentDecoder {
    color_depth: ColorDepth,
    layers_have_uuid: bool,
    layers: Vec<Layer>,
    tags: Vec<FrameTag>,
    sprite_user_data: Option<UserData>,
    seen_current_palette: bool,
    pool: ScratchPool,
}

impl DocumentDecoder {
    fn new(header: &Header) -> Self {
        Self {
            color_depth: header.color_depth,
            layers_have_uuid: header.layers_have_uuid(),
            layers: Vec::new(),
            tags: Vec::new(),
            sprite_user_data: None,
            seen_current_palette: false,
            pool: ScratchPool::default(),
        }
    }

    fn decode_frame(&mut self, cursor: &mut ByteCursor<'_>, index: u16) -> Result<Frame> {
        let frame_start = cursor.position();
        let frame_header = FrameHeader::read(cursor)?;
        if (frame_header.length as usize) < FRAME_HEADER_SIZE {
            return Err(Error::format(format!(
                "frame {index} declares length {}, smaller than its header",
                frame_header.length
            )));
        }
        let frame_end = frame_start + frame_header.length as usize;
        let chunk_count = frame_header.chunk_count();
        debug!(
            frame = index,
            chunks = chunk_count,
            duration_ms = frame_header.duration_ms,
            "decoding frame"
        );

        let mut frame = Frame {
            duration_ms: frame_header.duration_ms,
            chunk_count,
            layers: self.layers.len()..self.layers.len(),
            tags: self.tags.len()..self.tags.len(),
            ..Frame::default()
        };
        let mut owner = UserDataOwner::Sprite;

        for chunk_index in 0..chunk_count {
            if cursor.position() >= frame_end {
                warn!(
                    frame = index,
                    declared = chunk_count,
                    decoded = chunk_index,
                    "frame ended before its declared chunk count"
                );
                break;
            }

            let chunk_start = cursor.position();
            let chunk = ChunkHeader::read(cursor)?;
            let chunk_end = chunk_start + chunk.length as usize;
            trace!(offset = chunk_start, length = chunk.length, kind = ?chunk.chunk_type, "chunk");

            self.decode_chunk(cursor, chunk.chunk_type, chunk_end, &mut frame, &mut owner)?;

            // The declared length is authoritative, whatever the decoder consumed.
            cursor.seek_absolute(chunk_end)?;
        }

        frame.layers.end = self.layers.len();
        frame.tags.end = self.tags.len();
        // A chunk that overruns the frame wins; never step back into it.
        if cursor.position() > frame_end {
            warn!(
                frame = index,
                frame_end,
                chunk_end = cursor.position(),
                "last chunk extends past the declared frame length"
            );
        } else {
            cursor.seek_absolute(frame_end)?;
        }
        Ok(frame)
    }

    fn decode_chunk(
        &mut self,
        cursor: &mut ByteCursor<'_>,
        chunk_type: ChunkType,
        chunk_end: usize,
        frame: &mut Frame,
        owner: &mut UserDataOwner,
    ) -> Result<()> {
        match chunk_type {
            ChunkType::OldPalette | ChunkType::OldPalette64 => {
                if self.seen_current_palette {
                    trace!(kind = ?chunk_type, "legacy palette superseded, ignoring");
                } else {
                    frame.palettes.push(Palette::parse_legacy(cursor)?);
                }
            }
            ChunkType::Palette => {
                let palette = Palette::parse(cursor)?;
                frame
                    .palettes
                    .retain(|existing| existing.kind != PaletteKind::Legacy);
                frame.palettes.push(palette);
                self.seen_current_palette = true;
            }
            ChunkType::Layer => {
                let layer = Layer::parse(cursor, self.layers_have_uuid)?;
                self.layers.push(layer);
                *owner = UserDataOwner::Layer(self.layers.len() - 1);
            }
            ChunkType::Cel => {
                let cel = Cel::parse(cursor, chunk_end, self.color_depth, &self.pool)?;
                frame.cels.push(cel);
                *owner = UserDataOwner::Cel(frame.cels.len() - 1);
            }
            ChunkType::ColorProfile => {
                frame.color_profiles.push(ColorProfile::parse(cursor)?);
            }
            ChunkType::Tags => {
                let tags = FrameTag::parse_all(cursor)?;
                let next = self.tags.len();
                self.tags.extend(tags);
                *owner = UserDataOwner::Tags {
                    next,
                    end: self.tags.len(),
                };
            }
            ChunkType::UserData => {
                let user_data = UserData::parse(cursor)?;
                self.attach_user_data(user_data, frame, owner);
            }
            ChunkType::CelExtra
            | ChunkType::ExternalFiles
            | ChunkType::Mask
            | ChunkType::Path
            | ChunkType::Slice
            | ChunkType::Tileset => {
                trace!(kind = ?chunk_type, "chunk not decoded, skipping");
            }
            ChunkType::Unknown(code) => {
                trace!(code, "unknown chunk type, skipping");
            }
        }
        Ok(())
    }

    fn attach_user_data(
        &mut self,
        user_data: UserData,
        frame: &mut Frame,
        owner: &mut UserDataOwner,
    ) {
        match owner {
            UserDataOwner::Sprite => {
                if self.sprite_user_data.is_some() {
                    warn!("sprite already has user data, dropping");
                } else {
                    self.sprite_user_data = Some(user_data);
                }
            }
            UserDataOwner::Layer(index) => self.layers[*index].user_data = Some(user_data),
            UserDataOwner::Cel(index) => frame.cels[*index].user_data = Some(user_data),
            UserDataOwner::Tags { next, end } => {
                if *next < *end {
                    self.tags[*next].user_data = Some(user_data);
                    *next += 1;
                } else {
                    warn!("user data chunk after every tag was assigned, dropping");
                }
            }
        }
    }
}
