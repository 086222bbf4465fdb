use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};

/// Mean of the unmasked token states, L2-normalised per row.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]`; the result is `[B, H]`.
/// Rows whose mask is all zeros come back as zero vectors.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, tokens, width) = match *hidden.dims() {
        [b, t, h] => (b, t, h),
        ref other => anyhow::bail!("hidden shape must be [B,T,H], got {:?}", other),
    };
    ensure!(
        attention_mask.dims() == [batch, tokens],
        "attention mask shape {:?} does not match hidden {:?}",
        attention_mask.dims(),
        hidden.dims()
    );

    let weights = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?.unsqueeze(2)?;
    let summed = hidden.broadcast_mul(&weights)?.sum(1)?;
    let floor = if hidden.dtype() == DType::F16 { 1e-6 } else { 1e-12 };
    let counts = weights.sum(1)?.maximum(floor)?;
    let mean = summed.broadcast_div(&counts)?;

    let norms = mean.sqr()?.sum_keepdim(1)?.sqrt()?.maximum(floor)?;
    let pooled = mean.broadcast_div(&norms)?;
    ensure!(pooled.dims() == [batch, width], "pooled shape mismatch: {:?}", pooled.dims());
    Ok(pooled)
}
