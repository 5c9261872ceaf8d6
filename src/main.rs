use num_bigint::{BigInt, BigUint};
use scriptsig::encoding::{decode_address, hash256};
use scriptsig::{
    secp256k1, Command, EllipticCurve, FieldElement, Opcode, PrivateKey, Result, Script,
    SerializableSignature, SerializationFormat,
};

fn main() -> Result<()> {
    println!("=== secp256k1 and Script ===\n");

    demo_field()?;
    demo_small_curve()?;
    let (key, z) = demo_keys()?;
    demo_script(&key, &z)?;
    Ok(())
}

/// Arithmetic in F_19
fn demo_field() -> Result<()> {
    println!("--- Prime Field F_19 ---");

    let a = FieldElement::from_u64(2, 19)?;
    let b = FieldElement::from_u64(7, 19)?;
    println!("a = {}", a);
    println!("b = {}", b);
    println!("a + b = {}", &a + &b);
    println!("a - b = {}", &a - &b);
    println!("a * b = {}", &a * &b);
    println!("a / b = {}", &a / &b);
    println!("b^-3 = {}", b.pow(&BigInt::from(-3)));
    println!();
    Ok(())
}

/// Group law on y^2 = x^3 + 7 over F_223
fn demo_small_curve() -> Result<()> {
    println!("--- Curve y^2 = x^3 + 7 over F_223 ---");

    let fe = |v| FieldElement::from_u64(v, 223);
    let curve = EllipticCurve::new(fe(0)?, fe(7)?)?;
    let p = curve.point(fe(47)?, fe(71)?)?;
    println!("P = {}", p);
    for k in [2u32, 20, 21] {
        println!("{}P = {}", k, p.scalar_mul(&BigUint::from(k)));
    }
    println!();
    Ok(())
}

/// Key, addresses and a signature
fn demo_keys() -> Result<(PrivateKey, BigUint)> {
    println!("--- Keys and Signatures ---");

    let key = PrivateKey::new(BigUint::from_bytes_be(&hash256(b"my secret")))?;
    let public_key = key.public_key();
    println!("public key (compressed SEC): {}", hex::encode(public_key.sec(true)?));

    let address = public_key.address(true, true)?;
    let (version, hash) = decode_address(&address)?;
    println!("testnet address: {}", address);
    println!("  version 0x{:02x}, hash160 {}", version, hex::encode(hash));

    let z = BigUint::from_bytes_be(&hash256(b"my message"));
    let signature = key.sign(&z);
    println!("signature: {}", signature);
    println!("DER: {}", hex::encode(signature.der()));
    println!("verifies: {}", public_key.verify(&z, &signature));
    println!("verifies other digest: {}", public_key.verify(&(&z + 1u8), &signature));

    let json = SerializableSignature::from_signature(&signature, SerializationFormat::Base16)
        .to_json()?;
    println!("JSON:\n{}", json);
    println!("order n = {:x}", secp256k1::order());
    println!();
    Ok((key, z))
}

/// P2PKH spend: unlocking script followed by locking script
fn demo_script(key: &PrivateKey, z: &BigUint) -> Result<()> {
    println!("--- P2PKH Evaluation ---");

    let mut sig = key.sign(z).der();
    sig.push(0x01);
    let sec = key.public_key().sec(true)?;

    let unlocking = Script::new(vec![Command::Data(sig), Command::Data(sec)]);
    let locking = Script::p2pkh(&key.public_key().hash160(true)?);
    println!("locking script: {}", locking);
    println!("locking bytes: {}", hex::encode(locking.serialize()?));

    let combined = &unlocking + &locking;
    println!("valid spend: {}", combined.evaluate(z));
    println!("wrong digest: {}", combined.evaluate(&(z + 1u8)));

    let puzzle = Script::new(vec![
        Opcode::Op2.into(),
        Opcode::Op3.into(),
        Opcode::Add.into(),
        Opcode::Op5.into(),
        Opcode::NumEqual.into(),
    ]);
    println!("{} => {}", puzzle, puzzle.evaluate(z));
    Ok(())
}
