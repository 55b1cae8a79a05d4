//! Versioned transaction envelope
//!
//! Signature slots line up with the message's required signers. Slots for
//! signers the server does not hold stay zeroed until the requester's wallet
//! fills them.

use crate::message::Reader;
use crate::short_vec::encode_len;
use crate::{Result, TxError, V0Message};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solbound_crypto::TxSigner;
use solbound_types::{Pubkey, Signature};

/// A version-0 transaction with zero or more signatures filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedTransaction {
    pub signatures: Vec<Signature>,
    pub message: V0Message,
}

impl VersionedTransaction {
    /// Wrap a message with every signature slot empty
    pub fn new_unsigned(message: V0Message) -> Self {
        let slots = message.signer_keys().len();
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    /// Sign with a subset of the required signers
    ///
    /// Every signer must own a slot; slots without a signer are left empty.
    pub fn partial_sign(&mut self, signers: &[&dyn TxSigner]) -> Result<()> {
        let message_bytes = self.message.serialize()?;

        for signer in signers {
            let pubkey = signer.pubkey();
            let slot = self
                .message
                .signer_keys()
                .iter()
                .position(|k| *k == pubkey)
                .ok_or(TxError::UnknownSigner(pubkey))?;

            self.signatures[slot] = signer.sign_message(&message_bytes)?;
            tracing::debug!(signer = %pubkey, slot, "Filled signature slot");
        }

        Ok(())
    }

    /// Signature recorded for `pubkey`, if its slot is filled
    pub fn signature_of(&self, pubkey: &Pubkey) -> Option<&Signature> {
        let slot = self.message.signer_keys().iter().position(|k| k == pubkey)?;
        self.signatures
            .get(slot)
            .filter(|sig| **sig != Signature::default())
    }

    /// Required signers whose slots are still empty
    pub fn missing_signers(&self) -> Vec<Pubkey> {
        self.message
            .signer_keys()
            .iter()
            .zip(&self.signatures)
            .filter(|(_, sig)| **sig == Signature::default())
            .map(|(k, _)| *k)
            .collect()
    }

    /// Serialize to wire bytes
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let message = self.message.serialize()?;
        let mut out = Vec::with_capacity(1 + self.signatures.len() * Signature::LEN + message.len());
        encode_len(&mut out, self.signatures.len())?;
        for sig in &self.signatures {
            out.extend_from_slice(sig.as_bytes());
        }
        out.extend_from_slice(&message);
        Ok(out)
    }

    /// Serialize and base64-encode for transport
    pub fn to_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.serialize()?))
    }

    /// Parse wire bytes
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let count = reader.len()?;
        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            signatures.push(Signature::try_from_slice(reader.take(Signature::LEN)?)?);
        }

        let (message, used) = V0Message::deserialize(&bytes[reader.pos..])?;
        if reader.pos + used != bytes.len() {
            return Err(TxError::Malformed("trailing bytes after message".to_string()));
        }
        if signatures.len() != message.header.num_required_signatures as usize {
            return Err(TxError::Malformed(format!(
                "{} signatures for {} required signers",
                signatures.len(),
                message.header.num_required_signatures
            )));
        }

        Ok(Self { signatures, message })
    }

    /// Decode from base64 transport form
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| TxError::Malformed(format!("base64: {}", e)))?;
        Self::deserialize(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountMeta, Instruction};
    use solbound_crypto::{verify, Keypair};
    use solbound_types::Hash;

    fn two_signer_message(payer: &Pubkey, cosigner: &Pubkey) -> V0Message {
        let ix = Instruction::new(
            Pubkey::new([9; 32]),
            vec![AccountMeta::new_readonly(*cosigner, true)],
            vec![1],
        );
        V0Message::compile(payer, &[ix], Hash::new([4; 32])).unwrap()
    }

    #[test]
    fn test_partial_sign_leaves_payer_slot_open() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let message = two_signer_message(&payer.pubkey(), &cosigner.pubkey());

        let mut tx = VersionedTransaction::new_unsigned(message);
        tx.partial_sign(&[&cosigner]).unwrap();

        assert_eq!(tx.missing_signers(), vec![payer.pubkey()]);
        let sig = tx.signature_of(&cosigner.pubkey()).unwrap();
        let bytes = tx.message.serialize().unwrap();
        assert!(verify(&cosigner.pubkey(), &bytes, sig).unwrap());
    }

    #[test]
    fn test_unknown_signer_rejected() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let stranger = Keypair::generate();
        let mut tx = VersionedTransaction::new_unsigned(two_signer_message(&payer.pubkey(), &cosigner.pubkey()));

        assert!(matches!(
            tx.partial_sign(&[&stranger]),
            Err(TxError::UnknownSigner(k)) if k == stranger.pubkey()
        ));
    }

    #[test]
    fn test_base64_transport() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let mut tx = VersionedTransaction::new_unsigned(two_signer_message(&payer.pubkey(), &cosigner.pubkey()));
        tx.partial_sign(&[&cosigner]).unwrap();

        let decoded = VersionedTransaction::from_base64(&tx.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_rejects_trailing_bytes() {
        let payer = Keypair::generate();
        let cosigner = Keypair::generate();
        let tx = VersionedTransaction::new_unsigned(two_signer_message(&payer.pubkey(), &cosigner.pubkey()));
        let mut bytes = tx.serialize().unwrap();
        bytes.push(0);
        assert!(VersionedTransaction::deserialize(&bytes).is_err());
    }
}
