use crate::errors::{FlythroughError, Result};
use crate::gpu::{GpuTextureId, RenderBackend};
use crate::resources::{Texture, TextureSlot};

struct LoadedTexture {
    texture: Texture,
    gpu: GpuTextureId,
}

/// The textures the textured styles sample, one per slot.
///
/// The library owns the resident GPU textures. Replacing a slot hands the old
/// id back to the caller, who disposes it once no material samples it anymore.
#[derive(Default)]
pub struct TextureLibrary {
    slots: [Option<LoadedTexture>; 2],
}

impl std::fmt::Debug for TextureLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureLibrary")
            .field("a", &self.texture(TextureSlot::A).map(|t| &t.name))
            .field("b", &self.texture(TextureSlot::B).map(|t| &t.name))
            .finish()
    }
}

fn index(slot: TextureSlot) -> usize {
    match slot {
        TextureSlot::A => 0,
        TextureSlot::B => 1,
    }
}

impl TextureLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn gpu_id(&self, slot: TextureSlot) -> Option<GpuTextureId> {
        self.slots[index(slot)].as_ref().map(|t| t.gpu)
    }

    #[must_use]
    pub fn texture(&self, slot: TextureSlot) -> Option<&Texture> {
        self.slots[index(slot)].as_ref().map(|t| &t.texture)
    }

    #[must_use]
    pub fn is_loaded(&self, slot: TextureSlot) -> bool {
        self.slots[index(slot)].is_some()
    }

    /// Uploads `texture` into `slot` and returns the id it replaced.
    ///
    /// On upload failure the slot keeps its previous texture.
    pub(crate) fn insert<B: RenderBackend>(
        &mut self,
        slot: TextureSlot,
        texture: Texture,
        backend: &mut B,
    ) -> Result<Option<GpuTextureId>> {
        let gpu = backend.upload_texture(&texture)?;
        log::info!(
            "Texture slot {slot:?} <- `{}` ({}x{})",
            texture.name,
            texture.width,
            texture.height
        );
        let previous = self.slots[index(slot)].replace(LoadedTexture { texture, gpu });
        Ok(previous.map(|t| t.gpu))
    }

    pub(crate) fn release_all<B: RenderBackend>(&mut self, backend: &mut B) -> Vec<FlythroughError> {
        self.slots
            .iter_mut()
            .filter_map(Option::take)
            .filter_map(|t| backend.dispose_texture(t.gpu).err())
            .collect()
    }
}
