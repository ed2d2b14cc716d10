//! Human readable rendering of the PEM data the controller serves for a host.

use std::io::Write;

use x509_parser::{
    certificate::X509Certificate,
    extensions::{GeneralName, ParsedExtension},
    objects::{oid_registry, oid2sn},
    pem::Pem,
    x509::AlgorithmIdentifier,
};

/// Writes every PEM block of `data`.
///
/// Certificates are rendered as text between `BEGIN`/`END CERTIFICATE`
/// markers, blocks of any other type are reported as skipped, and a
/// certificate that does not parse is replaced by the parse error.
///
/// # Errors
///
/// Returns the error of writing to `out`.
pub fn write_pem_blocks<W>(data: &[u8], out: &mut W) -> std::io::Result<()>
where
    W: Write,
{
    for pem in Pem::iter_from_buffer(data) {
        let pem = match pem {
            Ok(pem) => pem,
            Err(err) => {
                tracing::debug!("Stopped reading PEM blocks, error: {err}");
                break;
            }
        };

        if pem.label != "CERTIFICATE" {
            writeln!(out, "skip {}", pem.label)?;
            continue;
        }

        match pem.parse_x509() {
            Ok(cert) => {
                writeln!(out, "-----BEGIN CERTIFICATE-----")?;
                write_certificate(&cert, out)?;
                writeln!(out, "-----END CERTIFICATE-----")?;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
    }
    Ok(())
}

fn write_certificate<W>(cert: &X509Certificate<'_>, out: &mut W) -> std::io::Result<()>
where
    W: Write,
{
    let version = cert.version().0;
    let validity = cert.validity();

    writeln!(out, "Certificate:")?;
    writeln!(out, "    Data:")?;
    writeln!(out, "        Version: {} ({version:#x})", version + 1)?;
    writeln!(out, "        Serial Number: {}", cert.raw_serial_as_string())?;
    writeln!(out, "        Signature Algorithm: {}", algorithm_name(&cert.signature_algorithm))?;
    writeln!(out, "        Issuer: {}", cert.issuer())?;
    writeln!(out, "        Validity")?;
    writeln!(out, "            Not Before: {}", validity.not_before)?;
    writeln!(out, "            Not After : {}", validity.not_after)?;
    writeln!(out, "        Subject: {}", cert.subject())?;
    writeln!(out, "        Subject Public Key Info:")?;
    let public_key_algorithm = algorithm_name(&cert.public_key().algorithm);
    writeln!(out, "            Public Key Algorithm: {public_key_algorithm}")?;

    if cert.extensions().is_empty() {
        return Ok(());
    }
    writeln!(out, "        X509v3 extensions:")?;
    for extension in cert.extensions() {
        let name = oid2sn(&extension.oid, oid_registry())
            .map_or_else(|_| extension.oid.to_id_string(), ToString::to_string);
        let critical = if extension.critical { " critical" } else { "" };
        writeln!(out, "            {name}:{critical}")?;

        match extension.parsed_extension() {
            ParsedExtension::SubjectAlternativeName(san) => {
                let names = san.general_names.iter().map(general_name).collect::<Vec<_>>();
                writeln!(out, "                {}", names.join(", "))?;
            }
            ParsedExtension::BasicConstraints(constraints) => {
                let ca = if constraints.ca { "TRUE" } else { "FALSE" };
                match constraints.path_len_constraint {
                    Some(len) => writeln!(out, "                CA:{ca}, pathlen:{len}")?,
                    None => writeln!(out, "                CA:{ca}")?,
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn algorithm_name(algorithm: &AlgorithmIdentifier<'_>) -> String {
    oid2sn(&algorithm.algorithm, oid_registry())
        .map_or_else(|_| algorithm.algorithm.to_id_string(), ToString::to_string)
}

fn general_name(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS:{dns}"),
        GeneralName::RFC822Name(email) => format!("email:{email}"),
        GeneralName::URI(uri) => format!("URI:{uri}"),
        GeneralName::IPAddress(bytes) => match bytes.len() {
            4 => {
                let octets: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
                format!("IP Address:{}", std::net::Ipv4Addr::from(octets))
            }
            16 => {
                let mut octets = [0_u8; 16];
                octets.copy_from_slice(bytes);
                format!("IP Address:{}", std::net::Ipv6Addr::from(octets))
            }
            _ => format!("IP Address:{bytes:02x?}"),
        },
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE_COM: &[u8] = include_bytes!("../test_fixtures/tls/example.com.pem");

    fn render(data: &[u8]) -> String {
        let mut out = Vec::new();
        write_pem_blocks(data, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_certificate_and_key() {
        let text = render(EXAMPLE_COM);

        assert!(text.starts_with("-----BEGIN CERTIFICATE-----\nCertificate:\n"));
        assert!(text.contains("        Version: 3 (0x2)\n"));
        assert!(text.contains("Serial Number: 1d:a2:8e:a2"));
        assert!(text.contains("Signature Algorithm: ecdsa-with-SHA256"));
        assert!(text.contains("CN=example.com"));
        assert!(text.contains("DNS:example.com, DNS:www.example.com"));
        assert!(text.contains("CA:TRUE"));
        assert!(text.contains("-----END CERTIFICATE-----\nskip PRIVATE KEY\n"));
    }

    #[test]
    fn test_raw_output_without_pem_blocks() {
        assert_eq!(render(b""), "");
        assert_eq!(render(b"certificate not found\n"), "");
    }

    #[test]
    fn test_broken_certificate_prints_error() {
        let broken = b"-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        let text = render(broken);
        assert!(!text.is_empty());
        assert!(!text.contains("BEGIN CERTIFICATE"));
    }

    #[test]
    fn test_general_name() {
        assert_eq!(general_name(&GeneralName::DNSName("example.com")), "DNS:example.com");
        assert_eq!(general_name(&GeneralName::IPAddress(&[10, 0, 0, 1])), "IP Address:10.0.0.1");
    }
}
